use std::future::Future;
use std::time::{Duration, Instant};

use migration::seeders::seed_clients;
use migration::{migrate, MigrationCommand, MigrationName, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::{info, trace, warn};

use crate::config::db::{
    make_conn_spec, pool_settings, session_statements, validate_db_config, DbKind, DbOwner,
    PoolPurpose, RuntimeEnv,
};
use crate::error::DbInfraError;
use crate::infra::db::locking::{BootstrapLock, Guard, InMemoryLock, PgAdvisoryLock};

const LOCK_ACQUIRE_TIMEOUT_MS: u64 = 10_000;

fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt, interval_ms
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt, max_attempts, interval_ms
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| DbInfraError::connect("no error recorded after max attempts")))
}

/// Single-connection owner pool used for migrations and seeding.
pub async fn build_admin_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    if db_kind == DbKind::SqliteFile {
        ensure_sqlite_dir(env)?;
    }

    let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;
    let settings = pool_settings(env, db_kind, PoolPurpose::Migration);

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);

    let pool = if matches!(db_kind, DbKind::Postgres) {
        retry_connection(
            || {
                let opt = opt.clone();
                async move {
                    Database::connect(opt).await.map_err(|e| {
                        DbInfraError::connect(format!(
                            "failed to connect to Postgres (admin pool): {e}"
                        ))
                    })
                }
            },
            5,
            500,
        )
        .await?
    } else {
        Database::connect(opt).await.map_err(|e| {
            DbInfraError::connect(format!("failed to connect to database (admin pool): {e}"))
        })?
    };

    apply_session_statements(&pool, db_kind).await?;
    Ok(pool)
}

/// Create the parent directory of a SQLite database file.
pub fn ensure_sqlite_dir(env: RuntimeEnv) -> Result<(), DbInfraError> {
    let path = crate::config::db::sqlite_file_path(env)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbInfraError::config(format!(
                "failed to create SQLite directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

async fn apply_session_statements(
    pool: &DatabaseConnection,
    db_kind: DbKind,
) -> Result<(), DbInfraError> {
    let backend = pool.get_database_backend();
    for stmt in session_statements(db_kind) {
        pool.execute(Statement::from_string(backend, stmt.clone()))
            .await
            .map_err(|e| DbInfraError::connect(format!("session statement '{stmt}' failed: {e}")))?;
    }
    Ok(())
}

/// Sanitize database URL by masking password in connection strings.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        // "postgresql://user" has its only colon in the scheme.
        Some(colon_pos) if !auth_part[colon_pos..].starts_with("://") => {
            format!("{}:***@{}", &auth_part[..colon_pos], host_part)
        }
        _ => url.to_string(),
    }
}

async fn fast_path_schema_check(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected_count = Migrator::migrations().len();
    let expected_last = Migrator::migrations()
        .last()
        .map(|m| m.name().to_string())
        .unwrap_or_default();

    let (current_count, current_last) = match Migrator::get_applied_migrations(conn).await {
        Ok(migrations) => (
            migrations.len(),
            migrations.last().map(|m| m.name().to_string()),
        ),
        Err(DbErr::Exec(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => {
            return Err(DbInfraError::migration(format!(
                "failed to get applied migrations: {e}"
            )));
        }
    };

    let is_up_to_date = current_count == expected_count
        && !expected_last.is_empty()
        && current_last.as_deref() == Some(expected_last.as_str());

    let outcome = if is_up_to_date { "hit" } else { "miss" };
    trace!(
        fastpath = outcome,
        current_count,
        expected_count,
        current_last = %current_last.as_deref().unwrap_or(""),
        expected_last = %expected_last
    );

    Ok(is_up_to_date)
}

/// Build an admin pool and run `command` against it.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(env, db_kind)?;
    let admin_pool = build_admin_pool(env, db_kind).await?;
    orchestrate_migration_internal(&admin_pool, env, db_kind, command).await
}

/// Run `command` on an existing pool, serialized across processes for Postgres.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(
        "migrate=start env={:?} db_kind={:?} engine={}",
        env,
        db_kind,
        get_db_engine(db_kind)
    );

    if !command.is_mutating() {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")))?;
        info!("migrate=done");
        return Ok(());
    }

    let result = match db_kind {
        DbKind::Postgres => {
            let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;
            let key = format!("portfolio:migrate:{}", sanitize_db_url(&url));
            migrate_with_lock(pool, PgAdvisoryLock::new(pool.clone(), &key), command).await
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            migrate_with_lock(pool, InMemoryLock, command).await
        }
    };

    info!("migrate=done");
    result
}

async fn migrate_with_lock<L>(
    pool: &DatabaseConnection,
    mut lock: L,
    command: MigrationCommand,
) -> Result<(), DbInfraError>
where
    L: BootstrapLock,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    let guard: Guard = loop {
        attempts += 1;

        if command == MigrationCommand::Up && fast_path_schema_check(pool).await? {
            info!("migrate=skipped up_to_date=true");
            return Ok(());
        }

        if let Some(guard) = lock.try_acquire().await? {
            trace!(lock = "won", attempts, elapsed_ms = start.elapsed().as_millis() as u64);
            break guard;
        }

        if start.elapsed() >= Duration::from_millis(LOCK_ACQUIRE_TIMEOUT_MS) {
            return Err(DbInfraError::migration(format!(
                "migration lock acquisition timeout after {:?} ({} attempts)",
                start.elapsed(),
                attempts
            )));
        }

        let delay_ms = (5u64 << attempts.saturating_sub(1).min(5)).min(80);
        trace!(lock = "backoff", attempts, delay_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    };

    let migration_result = migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")));

    if let Err(release_err) = guard.release().await {
        warn!(error = %release_err, "Failed to release migration guard");
    }

    migration_result?;

    let applied_count = Migrator::get_applied_migrations(pool)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    info!(
        migrate = "counts",
        expected_count = Migrator::migrations().len(),
        applied_count
    );

    Ok(())
}

/// Insert the sample clients through the admin pool.
pub async fn orchestrate_seed(env: RuntimeEnv, db_kind: DbKind) -> Result<u64, DbInfraError> {
    validate_db_config(env, db_kind)?;
    let admin_pool = build_admin_pool(env, db_kind).await?;
    seed_clients(&admin_pool)
        .await
        .map_err(|e| DbInfraError::migration(format!("seeding clients failed: {e}")))
}
