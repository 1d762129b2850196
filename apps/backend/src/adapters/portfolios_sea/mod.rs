//! SeaORM adapter for the portfolios table.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set, Unchanged,
};

use crate::entities::{clients, portfolios};

pub mod dto;

pub use dto::{PortfolioCreate, PortfolioUpdate};

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<portfolios::Model>, sea_orm::DbErr> {
    portfolios::Entity::find()
        .order_by_asc(portfolios::Column::Id)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
) -> Result<Option<portfolios::Model>, sea_orm::DbErr> {
    portfolios::Entity::find_by_id(portfolio_id).one(conn).await
}

pub async fn find_all_with_clients<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(portfolios::Model, Vec<clients::Model>)>, sea_orm::DbErr> {
    portfolios::Entity::find()
        .order_by_asc(portfolios::Column::Id)
        .find_with_related(clients::Entity)
        .all(conn)
        .await
}

pub async fn find_by_id_with_clients<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
) -> Result<Option<(portfolios::Model, Vec<clients::Model>)>, sea_orm::DbErr> {
    let rows = portfolios::Entity::find_by_id(portfolio_id)
        .find_with_related(clients::Entity)
        .all(conn)
        .await?;
    Ok(rows.into_iter().next())
}

pub async fn create_portfolio<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PortfolioCreate,
) -> Result<portfolios::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let portfolio_active = portfolios::ActiveModel {
        id: NotSet,
        portfolio_name: Set(dto.portfolio_name),
        created_at: Set(now),
        updated_at: Set(now),
    };

    portfolio_active.insert(conn).await
}

pub async fn update_portfolio<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PortfolioUpdate,
) -> Result<portfolios::Model, sea_orm::DbErr> {
    let portfolio_active = portfolios::ActiveModel {
        id: Unchanged(dto.id),
        portfolio_name: Set(dto.portfolio_name),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    portfolio_active.update(conn).await
}

/// Pivot rows go with it (ON DELETE CASCADE).
pub async fn delete_portfolio<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    portfolio_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = portfolios::Entity::delete_by_id(portfolio_id)
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
