//! SeaORM adapter for the clients table.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set, Unchanged,
};

use crate::entities::{clients, portfolios};

pub mod dto;

pub use dto::{ClientCreate, ClientUpdate};

pub async fn find_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<clients::Model>, sea_orm::DbErr> {
    clients::Entity::find()
        .order_by_asc(clients::Column::Id)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    client_id: i64,
) -> Result<Option<clients::Model>, sea_orm::DbErr> {
    clients::Entity::find_by_id(client_id).one(conn).await
}

/// All clients, each with the portfolios it belongs to.
pub async fn find_all_with_portfolios<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(clients::Model, Vec<portfolios::Model>)>, sea_orm::DbErr> {
    clients::Entity::find()
        .order_by_asc(clients::Column::Id)
        .find_with_related(portfolios::Entity)
        .all(conn)
        .await
}

pub async fn find_by_id_with_portfolios<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    client_id: i64,
) -> Result<Option<(clients::Model, Vec<portfolios::Model>)>, sea_orm::DbErr> {
    let rows = clients::Entity::find_by_id(client_id)
        .find_with_related(portfolios::Entity)
        .all(conn)
        .await?;
    Ok(rows.into_iter().next())
}

pub async fn create_client<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ClientCreate,
) -> Result<clients::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let client_active = clients::ActiveModel {
        id: NotSet,
        client_name: Set(dto.client_name),
        created_at: Set(now),
        updated_at: Set(now),
    };

    client_active.insert(conn).await
}

pub async fn update_client<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ClientUpdate,
) -> Result<clients::Model, sea_orm::DbErr> {
    let client_active = clients::ActiveModel {
        id: Unchanged(dto.id),
        client_name: Set(dto.client_name),
        created_at: NotSet,
        updated_at: Set(time::OffsetDateTime::now_utc()),
    };

    client_active.update(conn).await
}

/// Pivot rows go with it (ON DELETE CASCADE).
pub async fn delete_client<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    client_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = clients::Entity::delete_by_id(client_id).exec(conn).await?;
    Ok(result.rows_affected)
}
