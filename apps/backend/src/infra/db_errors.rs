//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repositories convert it into
//! `DomainError` here, and handlers then map `DomainError` to `AppError`.

use sea_orm::{DbErr, RuntimeErr, SqlErr};
use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::trace_ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Constraint {
    Unique,
    NotNull,
    ForeignKey,
    Check,
}

impl Constraint {
    /// Postgres SQLSTATE or SQLite extended result code.
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "23505" | "2067" | "1555" => Some(Self::Unique),
            "23502" | "1299" => Some(Self::NotNull),
            "23503" | "787" => Some(Self::ForeignKey),
            "23514" | "275" => Some(Self::Check),
            _ => None,
        }
    }

    /// Last resort for errors that reach us without a driver code.
    fn from_message(msg: &str) -> Option<Self> {
        if msg.contains("duplicate key value violates unique constraint")
            || msg.contains("UNIQUE constraint failed")
        {
            Some(Self::Unique)
        } else if msg.contains("NOT NULL constraint failed") || msg.contains("violates not-null")
        {
            Some(Self::NotNull)
        } else if msg.contains("FOREIGN KEY constraint failed")
            || msg.contains("violates foreign key constraint")
        {
            Some(Self::ForeignKey)
        } else if msg.contains("CHECK constraint failed") || msg.contains("violates check constraint")
        {
            Some(Self::Check)
        } else {
            None
        }
    }

    fn detail(self) -> &'static str {
        match self {
            Self::Unique => "Unique constraint violation",
            Self::NotNull => "Not-null constraint violation",
            Self::ForeignKey => "Foreign key constraint violation",
            Self::Check => "Check constraint violation",
        }
    }
}

fn driver_code(e: &DbErr) -> Option<String> {
    match e {
        DbErr::Exec(RuntimeErr::SqlxError(err)) | DbErr::Query(RuntimeErr::SqlxError(err)) => err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

fn classify_constraint(e: &DbErr, msg: &str) -> Option<Constraint> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => return Some(Constraint::Unique),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => return Some(Constraint::ForeignKey),
        _ => {}
    }
    driver_code(e)
        .as_deref()
        .and_then(Constraint::from_code)
        .or_else(|| Constraint::from_message(msg))
}

/// Translate a `DbErr` into a `DomainError` with a client-safe detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if let Some(constraint) = classify_constraint(&e, &error_msg) {
        let detail = constraint.detail();
        warn!(trace_id = %trace_id, raw_error = %error_msg, "{detail}");
        return match constraint {
            Constraint::Unique => DomainError::conflict(ConflictKind::Unique, detail),
            _ => DomainError::validation(ValidationKind::Constraint, detail),
        };
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(InfraErrorKind::Other(error_msg), "Database operation failed")
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        map_db_err(e)
    }
}
