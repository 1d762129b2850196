//! Sample data for development databases.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    ClientName,
}

/// ASX 50 sample companies.
pub const SAMPLE_CLIENT_NAMES: [&str; 15] = [
    "BHP",
    "Commonwealth Bank",
    "Telstra",
    "Woolworths",
    "Macquarie Group",
    "Westpac Banking",
    "National Australia Bank",
    "ANZ Banking Group",
    "Fortescue Metals Group",
    "Wesfarmers",
    "Rio Tinto",
    "Afterpay",
    "QBE Insurance Group",
    "Scentre Group",
    "Amcor",
];

/// Insert the sample clients. Skips when `clients` already has rows.
///
/// Returns the number of rows inserted.
pub async fn seed_clients<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let backend = db.get_database_backend();

    let count_stmt = Query::select()
        .expr(Expr::col(Clients::Id).count())
        .from(Clients::Table)
        .to_owned();
    let existing: i64 = match db.query_one(backend.build(&count_stmt)).await? {
        Some(row) => row.try_get_by_index(0)?,
        None => 0,
    };

    if existing > 0 {
        tracing::info!(existing, "seed=clients skipped (table not empty)");
        return Ok(0);
    }

    let mut insert = Query::insert();
    insert
        .into_table(Clients::Table)
        .columns([Clients::ClientName]);
    for name in SAMPLE_CLIENT_NAMES {
        insert
            .values([name.into()])
            .map_err(|e| DbErr::Custom(format!("failed to build seed insert: {e}")))?;
    }

    let result = db.execute(backend.build(&insert)).await?;
    tracing::info!(inserted = result.rows_affected(), "seed=clients done");
    Ok(result.rows_affected())
}
