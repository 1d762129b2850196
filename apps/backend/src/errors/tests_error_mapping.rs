// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(ValidationKind::Constraint, "NOT NULL failed");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_missing_field_to_its_own_code() {
    let app: AppError = DomainError::missing_field("clientName").into();
    assert_eq!(app.code(), ErrorCode::MissingField);
    assert_eq!(app.status().as_u16(), 422);
    assert_eq!(app.detail(), "Field 'clientName' is required");
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::Unique, "duplicate");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found_per_resource() {
    let cases = [
        (NotFoundKind::User, "USER_NOT_FOUND"),
        (NotFoundKind::Client, "CLIENT_NOT_FOUND"),
        (NotFoundKind::Portfolio, "PORTFOLIO_NOT_FOUND"),
        (
            NotFoundKind::ClientOrPortfolio,
            "CLIENT_OR_PORTFOLIO_NOT_FOUND",
        ),
        (NotFoundKind::Other("Record".into()), "NOT_FOUND"),
    ];
    for (kind, code) in cases {
        let app: AppError = DomainError::not_found(kind, "missing").into();
        assert_eq!(app.code().as_str(), code);
        assert_eq!(app.status().as_u16(), 404);
    }
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let other = DomainError::infra(
        InfraErrorKind::Other("near \"SELEC\": syntax error".into()),
        "Database operation failed",
    );
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
    assert_eq!(app.status().as_u16(), 500);
    assert_eq!(app.detail(), "Database operation failed");
    assert_eq!(app.internal_detail(), Some("near \"SELEC\": syntax error"));
}
