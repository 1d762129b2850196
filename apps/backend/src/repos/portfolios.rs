//! Portfolio repository.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::clients::Client;
use super::{RelatedRepo, Repo, WithRelated};
use crate::adapters::portfolios_sea as portfolios_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: i64,
    pub portfolio_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPortfolio {
    pub portfolio_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioPatch {
    pub portfolio_name: Option<String>,
}

impl PortfolioPatch {
    pub fn merge(self, current: Portfolio) -> Portfolio {
        Portfolio {
            portfolio_name: self.portfolio_name.unwrap_or(current.portfolio_name),
            ..current
        }
    }
}

pub struct PortfolioRepo;

#[async_trait]
impl Repo for PortfolioRepo {
    type Record = Portfolio;
    type NewRecord = NewPortfolio;
    type Patch = PortfolioPatch;

    fn not_found(id: i64) -> DomainError {
        DomainError::not_found(NotFoundKind::Portfolio, format!("Portfolio {id} not found"))
    }

    async fn all<C: ConnectionTrait + Send + Sync>(
        conn: &C,
    ) -> Result<Vec<Portfolio>, DomainError> {
        let portfolios = portfolios_adapter::find_all(conn).await?;
        Ok(portfolios.into_iter().map(Portfolio::from).collect())
    }

    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<Portfolio>, DomainError> {
        let portfolio = portfolios_adapter::find_by_id(conn, id).await?;
        Ok(portfolio.map(Portfolio::from))
    }

    async fn create<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        new: NewPortfolio,
    ) -> Result<Portfolio, DomainError> {
        let dto = portfolios_adapter::PortfolioCreate::new(new.portfolio_name);
        let portfolio = portfolios_adapter::create_portfolio(conn, dto).await?;
        Ok(Portfolio::from(portfolio))
    }

    async fn merge_save<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
        patch: PortfolioPatch,
    ) -> Result<Portfolio, DomainError> {
        let merged = patch.merge(Self::require(conn, id).await?);
        let dto = portfolios_adapter::PortfolioUpdate {
            id: merged.id,
            portfolio_name: merged.portfolio_name,
        };
        let portfolio = portfolios_adapter::update_portfolio(conn, dto).await?;
        Ok(Portfolio::from(portfolio))
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), DomainError> {
        match portfolios_adapter::delete_portfolio(conn, id).await? {
            0 => Err(Self::not_found(id)),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RelatedRepo for PortfolioRepo {
    type Related = Client;

    const RELATED_FIELD: &'static str = "clients";

    async fn find_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        id: i64,
    ) -> Result<Option<WithRelated<Portfolio, Client>>, DomainError> {
        let row = portfolios_adapter::find_by_id_with_clients(conn, id).await?;
        Ok(row.map(|(portfolio, clients)| {
            WithRelated::new(
                Portfolio::from(portfolio),
                Self::RELATED_FIELD,
                clients.into_iter().map(Client::from).collect(),
            )
        }))
    }

    async fn all_with_related<C: ConnectionTrait + Send + Sync>(
        conn: &C,
    ) -> Result<Vec<WithRelated<Portfolio, Client>>, DomainError> {
        let rows = portfolios_adapter::find_all_with_clients(conn).await?;
        Ok(rows
            .into_iter()
            .map(|(portfolio, clients)| {
                WithRelated::new(
                    Portfolio::from(portfolio),
                    Self::RELATED_FIELD,
                    clients.into_iter().map(Client::from).collect(),
                )
            })
            .collect())
    }
}

impl From<crate::entities::portfolios::Model> for Portfolio {
    fn from(model: crate::entities::portfolios::Model) -> Self {
        Self {
            id: model.id,
            portfolio_name: model.portfolio_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
