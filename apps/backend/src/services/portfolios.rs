//! Portfolio domain service: attaching clients to portfolios.

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{portfolio_clients, ClientRepo, Portfolio, PortfolioRepo, Repo};

/// Result of an attach request.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachOutcome {
    pub portfolio: Portfolio,
    /// `false` when the pair was already linked.
    pub created: bool,
}

impl AttachOutcome {
    pub fn message(&self) -> &'static str {
        if self.created {
            "Client added to portfolio"
        } else {
            "Client already in portfolio"
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Link `client_id` to `portfolio_id`.
    ///
    /// Both rows must exist. Linking an already-linked pair is a no-op.
    /// Run this inside one transaction so the lookups and the insert agree.
    pub async fn attach_client<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        client_id: i64,
        portfolio_id: i64,
    ) -> Result<AttachOutcome, DomainError> {
        let portfolio = PortfolioRepo::find_by_id(conn, portfolio_id).await?;
        let client = ClientRepo::find_by_id(conn, client_id).await?;

        let (Some(portfolio), Some(_client)) = (portfolio, client) else {
            debug!(client_id, portfolio_id, "attach rejected: missing side");
            return Err(DomainError::not_found(
                NotFoundKind::ClientOrPortfolio,
                "Either the portfolio or client was not found",
            ));
        };

        let created = portfolio_clients::link(conn, portfolio_id, client_id).await?;
        info!(client_id, portfolio_id, created, "client attached to portfolio");

        Ok(AttachOutcome { portfolio, created })
    }
}
