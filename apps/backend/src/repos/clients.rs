//! Client repository.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::portfolios::Portfolio;
use super::{RelatedRepo, Repo, WithRelated};
use crate::adapters::clients_sea as clients_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub client_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub client_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub client_name: Option<String>,
}

impl ClientPatch {
    pub fn merge(self, current: Client) -> Client {
        Client {
            client_name: self.client_name.unwrap_or(current.client_name),
            ..current
        }
    }
}

pub struct ClientRepo;

#[async_trait]
impl Repo for ClientRepo {
    type Record = Client;
    type NewRecord = NewClient;
    type Patch = ClientPatch;

    fn not_found(id: i64) -> DomainError {
        DomainError::not_found(NotFoundKind::Client, format!("Client {id} not found"))
    }

    async fn all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Client>, DomainError> {
        let clients = clients_adapter::find_all(conn).await?;
        Ok(clients.into_iter().map(Client::from).collect())
    }

    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<Client>, DomainError> {
        let client = clients_adapter::find_by_id(conn, id).await?;
        Ok(client.map(Client::from))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        new: NewClient,
    ) -> Result<Client, DomainError> {
        let client =
            clients_adapter::create_client(conn, clients_adapter::ClientCreate::new(new.client_name))
                .await?;
        Ok(Client::from(client))
    }

    async fn merge_save<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
        patch: ClientPatch,
    ) -> Result<Client, DomainError> {
        let merged = patch.merge(Self::require(conn, id).await?);
        let dto = clients_adapter::ClientUpdate {
            id: merged.id,
            client_name: merged.client_name,
        };
        let client = clients_adapter::update_client(conn, dto).await?;
        Ok(Client::from(client))
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
        match clients_adapter::delete_client(conn, id).await? {
            0 => Err(Self::not_found(id)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RelatedRepo for ClientRepo {
    type Related = Portfolio;

    const RELATED_FIELD: &'static str = "portfolios";

    async fn find_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<WithRelated<Client, Portfolio>>, DomainError> {
        let row = clients_adapter::find_by_id_with_portfolios(conn, id).await?;
        Ok(row.map(|(client, portfolios)| {
            WithRelated::new(
                Client::from(client),
                Self::RELATED_FIELD,
                portfolios.into_iter().map(Portfolio::from).collect(),
            )
        }))
    }

    async fn all_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
    ) -> Result<Vec<WithRelated<Client, Portfolio>>, DomainError> {
        let rows = clients_adapter::find_all_with_portfolios(conn).await?;
        Ok(rows
            .into_iter()
            .map(|(client, portfolios)| {
                WithRelated::new(
                    Client::from(client),
                    Self::RELATED_FIELD,
                    portfolios.into_iter().map(Portfolio::from).collect(),
                )
            })
            .collect())
    }
}

impl From<crate::entities::clients::Model> for Client {
    fn from(model: crate::entities::clients::Model) -> Self {
        Self {
            id: model.id,
            client_name: model.client_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
