use std::env;
use std::env::VarError;
use std::str::FromStr;

use portfolio_backend::config::db::{DbKind, RuntimeEnv};
use portfolio_backend::infra::state::{build_state, StateBuilder};
use portfolio_backend::{AppError, AppState};

fn read_env_db_kind() -> Result<Option<String>, AppError> {
    match env::var("PORTFOLIO_TEST_DB_KIND") {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(AppError::config(format!(
            "failed to read PORTFOLIO_TEST_DB_KIND: {err}"
        ))),
    }
}

/// Database kind for test states; in-memory SQLite unless overridden.
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    match read_env_db_kind()? {
        Some(raw) => Ok(DbKind::from_str(&raw)?),
        None => Ok(DbKind::SqliteMemory),
    }
}

pub fn test_state_builder() -> Result<StateBuilder, AppError> {
    let db_kind = resolve_test_db_kind()?;
    Ok(build_state().with_env(RuntimeEnv::Test).with_db(db_kind))
}

/// Fresh, migrated state. With SQLite in-memory every call is a new database.
pub async fn build_test_state() -> Result<AppState, AppError> {
    test_state_builder()?.build().await
}
