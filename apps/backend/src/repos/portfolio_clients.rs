//! Pivot repository: links between portfolios and clients.

use sea_orm::ConnectionTrait;

use crate::adapters::portfolio_clients_sea as pivot_adapter;
use crate::errors::domain::DomainError;

/// Insert the link if absent. `true` means a new row was written.
pub async fn link<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
    client_id: i64,
) -> Result<bool, DomainError> {
    Ok(pivot_adapter::attach(conn, portfolio_id, client_id).await?)
}

pub async fn is_linked<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
    client_id: i64,
) -> Result<bool, DomainError> {
    Ok(pivot_adapter::find_pair(conn, portfolio_id, client_id)
        .await?
        .is_some())
}

pub async fn count_for_portfolio<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
) -> Result<u64, DomainError> {
    Ok(pivot_adapter::count_for_portfolio(conn, portfolio_id).await?)
}

pub async fn count_for_client<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    client_id: i64,
) -> Result<u64, DomainError> {
    Ok(pivot_adapter::count_for_client(conn, client_id).await?)
}
