//! DTOs for clients_sea adapter.

#[derive(Debug, Clone)]
pub struct ClientCreate {
    pub client_name: String,
}

impl ClientCreate {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub id: i64,
    pub client_name: String,
}
