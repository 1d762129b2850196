use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::DbInfraError;

pub fn pg_lock_id(key: &str) -> i64 {
    xxh3_64(key.as_bytes()) as i64
}

/// A held migration lock. Must be released explicitly.
pub struct Guard {
    admin_pool: Option<DatabaseConnection>,
    lock_key: i64,
    released: bool,
}

impl Guard {
    fn postgres(admin_pool: DatabaseConnection, lock_key: i64) -> Self {
        Self {
            admin_pool: Some(admin_pool),
            lock_key,
            released: false,
        }
    }

    fn in_memory() -> Self {
        Self {
            admin_pool: None,
            lock_key: 0,
            released: false,
        }
    }

    pub async fn release(mut self) -> Result<(), DbInfraError> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let Some(pool) = self.admin_pool.take() else {
            return Ok(());
        };

        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_advisory_unlock($1) AS unlocked",
            vec![self.lock_key.into()],
        );
        let row = pool
            .query_one(stmt)
            .await
            .map_err(|e| DbInfraError::migration(format!("failed to release advisory lock: {e}")))?;

        let unlocked = row
            .map(|r| r.try_get::<bool>("", "unlocked").unwrap_or(false))
            .unwrap_or(false);
        if !unlocked {
            warn!(lock_key = self.lock_key, "advisory lock was not held at release");
        } else {
            debug!(lock_key = self.lock_key, "advisory lock released");
        }
        Ok(())
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if !self.released && self.admin_pool.is_some() {
            warn!(
                lock_key = self.lock_key,
                "migration guard dropped without release; lock ends with the session"
            );
        }
    }
}

#[async_trait]
pub trait BootstrapLock {
    /// Try to acquire the lock (non-blocking).
    /// Returns Some(Guard) if acquired, None if already held by another process.
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError>;
}

/// PostgreSQL advisory lock using admin pool
pub struct PgAdvisoryLock {
    admin_pool: DatabaseConnection,
    lock_key: i64,
}

impl PgAdvisoryLock {
    /// INVARIANT: the admin pool is configured with **min=max=1** so all
    /// checkouts reuse the same session that holds the advisory lock.
    pub fn new(admin_pool: DatabaseConnection, key: &str) -> Self {
        Self {
            admin_pool,
            lock_key: pg_lock_id(key),
        }
    }
}

#[async_trait]
impl BootstrapLock for PgAdvisoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        let lock_stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "SELECT pg_try_advisory_lock($1) AS locked",
            vec![self.lock_key.into()],
        );

        let result = self
            .admin_pool
            .query_one(lock_stmt)
            .await
            .map_err(|e| DbInfraError::migration(format!("failed to acquire advisory lock: {e}")))?;

        let locked: bool = match result {
            Some(row) => row
                .try_get("", "locked")
                .map_err(|e| DbInfraError::migration(format!("failed to read lock result: {e}")))?,
            None => {
                return Err(DbInfraError::migration(
                    "pg_try_advisory_lock returned no row",
                ))
            }
        };

        if !locked {
            return Ok(None);
        }

        Ok(Some(Guard::postgres(
            self.admin_pool.clone(),
            self.lock_key,
        )))
    }
}

/// No-op lock for SQLite, where a single process owns the file.
pub struct InMemoryLock;

#[async_trait]
impl BootstrapLock for InMemoryLock {
    async fn try_acquire(&mut self) -> Result<Option<Guard>, DbInfraError> {
        Ok(Some(Guard::in_memory()))
    }
}
