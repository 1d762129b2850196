use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "client_name")]
    pub client_name: String,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolio_clients::Entity")]
    PortfolioClients,
}

impl Related<super::portfolio_clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortfolioClients.def()
    }
}

// Many-to-many through the pivot table.
impl Related<super::portfolios::Entity> for Entity {
    fn to() -> RelationDef {
        super::portfolio_clients::Relation::Portfolios.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::portfolio_clients::Relation::Clients.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
