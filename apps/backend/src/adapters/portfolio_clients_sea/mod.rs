//! SeaORM adapter for the portfolio_clients pivot table.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::entities::portfolio_clients;

/// Link a client to a portfolio.
///
/// Returns `true` when a row was inserted and `false` when the pair was
/// already linked.
pub async fn attach<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
    client_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let pivot_active = portfolio_clients::ActiveModel {
        portfolio_id: Set(portfolio_id),
        client_id: Set(client_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = portfolio_clients::Entity::insert(pivot_active)
        .on_conflict(
            OnConflict::columns([
                portfolio_clients::Column::PortfolioId,
                portfolio_clients::Column::ClientId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(rows == 1)
}

pub async fn find_pair<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
    client_id: i64,
) -> Result<Option<portfolio_clients::Model>, sea_orm::DbErr> {
    portfolio_clients::Entity::find_by_id((portfolio_id, client_id))
        .one(conn)
        .await
}

pub async fn count_for_portfolio<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    portfolio_clients::Entity::find()
        .filter(portfolio_clients::Column::PortfolioId.eq(portfolio_id))
        .count(conn)
        .await
}

pub async fn count_for_client<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    client_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    portfolio_clients::Entity::find()
        .filter(portfolio_clients::Column::ClientId.eq(client_id))
        .count(conn)
        .await
}
