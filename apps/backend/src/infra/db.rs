//! Application pool construction and startup migration.

use std::str::FromStr;
use std::time::Duration;

use db_infra::config::db::{
    make_conn_spec, pool_settings, session_statements, validate_db_config, DbKind, DbOwner,
    PoolPurpose, RuntimeEnv,
};
use db_infra::{build_admin_pool, orchestrate_migration_internal};
use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, trace};

use crate::error::AppError;

/// Build the app pool and bring the schema up to date.
///
/// SQLite in-memory is migrated on the very connection it serves; every
/// other kind is migrated through a separate single-connection admin pool.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    validate_db_config(env, db_kind)?;
    info!(
        "bootstrap=start env={:?} db_kind={:?} pid={}",
        env,
        db_kind,
        std::process::id()
    );

    let pool = match db_kind {
        DbKind::SqliteMemory => {
            let pool = build_pool(env, db_kind).await?;
            orchestrate_migration_internal(&pool, env, db_kind, MigrationCommand::Up).await?;
            pool
        }
        DbKind::Postgres | DbKind::SqliteFile => {
            let admin_pool = build_admin_pool(env, db_kind).await?;
            orchestrate_migration_internal(&admin_pool, env, db_kind, MigrationCommand::Up)
                .await?;
            admin_pool.close().await?;
            build_pool(env, db_kind).await?
        }
    };

    info!("bootstrap=ready");
    Ok(pool)
}

/// Runtime pool with per-connection session statements.
pub async fn build_pool(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = make_conn_spec(env, db_kind, DbOwner::App)?;
    let settings = pool_settings(env, db_kind, PoolPurpose::Runtime);

    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let connect_opts = SqliteConnectOptions::from_str(&url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true)
                .foreign_keys(true)
                .busy_timeout(Duration::from_secs(5));

            let mut pool_opts = SqlitePoolOptions::new()
                .min_connections(settings.min_connections)
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout)
                .after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        for stmt in session_statements(db_kind) {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        trace!("db=sqlite hook=after_connect ok");
                        Ok(())
                    })
                });

            // The database lives and dies with its only connection.
            if db_kind == DbKind::SqliteMemory {
                pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
            }

            let pool = pool_opts
                .connect_with(connect_opts)
                .await
                .map_err(|e| AppError::config(format!("failed to create SQLite pool: {e}")))?;

            info!(
                "pool=create engine=sqlite min={} max={}",
                settings.min_connections, settings.max_connections
            );
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbKind::Postgres => {
            let pool = PgPoolOptions::new()
                .min_connections(settings.min_connections)
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout)
                .idle_timeout(Duration::from_secs(30))
                .after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        for stmt in session_statements(db_kind) {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        Ok(())
                    })
                })
                .connect(&url)
                .await
                .map_err(|e| AppError::config(format!("failed to connect to Postgres: {e}")))?;

            info!(
                "pool=create engine=postgres min={} max={}",
                settings.min_connections, settings.max_connections
            );
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
    }
}
