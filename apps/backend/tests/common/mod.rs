#![allow(dead_code)]

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::{
    assert_problem_details_from_service_response, ProblemDetailsLike,
};
use portfolio_backend::db::txn_policy::{set_txn_policy, TxnPolicy};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Every test state is its own database, so commit by default; flip with
// `PORTFOLIO_TXN_POLICY=rollback`.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("PORTFOLIO_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "rollback" => TxnPolicy::RollbackOnOk,
        _ => TxnPolicy::CommitOnOk,
    };
    set_txn_policy(policy);
}

/// Assert the error contract and return the parsed body.
///
/// 503 responses must carry `Retry-After`; no other status may.
pub async fn assert_problem<B: actix_web::body::MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ProblemDetailsLike {
    let has_retry_after = resp.headers().contains_key("retry-after");
    assert_eq!(
        has_retry_after,
        expected_status == StatusCode::SERVICE_UNAVAILABLE,
        "Retry-After presence for {expected_status}"
    );
    assert_problem_details_from_service_response(resp, expected_code, expected_status, None).await
}

/// Read a JSON body, asserting the status first.
pub async fn json_body<B: actix_web::body::MessageBody>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
) -> Value {
    assert_eq!(resp.status(), expected_status);
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "expected JSON body, got {}",
            String::from_utf8_lossy(&body)
        )
    })
}

/// Parse an RFC 3339 timestamp field such as `updatedAt`.
pub fn timestamp(body: &Value, field: &str) -> OffsetDateTime {
    let raw = body[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} should be a string in {body}"));
    OffsetDateTime::parse(raw, &Rfc3339).unwrap_or_else(|e| panic!("{field}={raw}: {e}"))
}
