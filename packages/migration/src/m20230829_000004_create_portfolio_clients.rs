use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::ForeignKeyAction;

#[derive(DeriveMigrationName)]
pub struct Migration;

// The pivot table name combines both related tables.
#[derive(Iden)]
enum PortfolioClients {
    Table,
    PortfolioId,
    ClientId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Portfolios {
    Table,
    Id,
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioClients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioClients::PortfolioId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioClients::ClientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioClients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PortfolioClients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_portfolio_clients")
                            .col(PortfolioClients::PortfolioId)
                            .col(PortfolioClients::ClientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_clients_portfolio_id")
                            .from(PortfolioClients::Table, PortfolioClients::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_clients_client_id")
                            .from(PortfolioClients::Table, PortfolioClients::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookups (client -> portfolios) can't use the composite PK prefix.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_clients_client_id")
                    .table(PortfolioClients::Table)
                    .col(PortfolioClients::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dropping the table drops its indexes as well.
        manager
            .drop_table(Table::drop().table(PortfolioClients::Table).to_owned())
            .await
    }
}
