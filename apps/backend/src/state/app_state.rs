use sea_orm::DatabaseConnection;

/// Shared application state, cloned into each worker via `web::Data`
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Database pool (absent only in handler-only tests)
    db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Some(db) }
    }

    /// State with no database; every storage call yields `DbUnavailable`.
    pub fn without_db() -> Self {
        Self { db: None }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
