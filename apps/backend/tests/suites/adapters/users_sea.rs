//! Adapter tests for users_sea.

use std::time::Duration;

use portfolio_backend::adapters::users_sea::{self, UserCreate, UserUpdate};
use portfolio_backend::db::txn::with_txn;
use portfolio_backend::error::AppError;

use crate::support::build_test_state;

#[tokio::test]
async fn create_and_find_by_id() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let created = users_sea::create_user(
                txn,
                UserCreate::new("Ada", "Lovelace").with_phone_number("0400 111 222"),
            )
            .await?;

            assert!(created.id > 0);
            assert_eq!(created.created_at, created.updated_at);

            let found = users_sea::find_by_id(txn, created.id)
                .await?
                .expect("user should exist");
            assert_eq!(found, created);
            assert_eq!(found.phone_number.as_deref(), Some("0400 111 222"));

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn update_refreshes_updated_at_only() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let created = users_sea::create_user(txn, UserCreate::new("Ada", "Lovelace")).await?;
            tokio::time::sleep(Duration::from_millis(20)).await;

            let updated = users_sea::update_user(
                txn,
                UserUpdate {
                    id: created.id,
                    first_name: "Ada".into(),
                    last_name: "King".into(),
                    phone_number: None,
                },
            )
            .await?;

            assert_eq!(updated.last_name, "King");
            assert_eq!(updated.created_at, created.created_at);
            assert!(updated.updated_at > created.updated_at);

            let stored = users_sea::find_by_id(txn, created.id)
                .await?
                .expect("user should exist");
            assert_eq!(stored.updated_at, updated.updated_at);
            assert_eq!(stored.created_at, created.created_at);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn update_missing_row_is_record_not_updated() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let err = users_sea::update_user(
                txn,
                UserUpdate {
                    id: 404,
                    first_name: "No".into(),
                    last_name: "One".into(),
                    phone_number: None,
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, sea_orm::DbErr::RecordNotUpdated));
            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_reports_rows_affected() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let created = users_sea::create_user(txn, UserCreate::new("Ada", "Lovelace")).await?;

            assert_eq!(users_sea::delete_user(txn, created.id).await?, 1);
            assert_eq!(users_sea::delete_user(txn, created.id).await?, 0);
            assert!(users_sea::find_by_id(txn, created.id).await?.is_none());
            assert!(users_sea::find_all(txn).await?.is_empty());

            Ok::<_, AppError>(())
        })
    })
    .await
}
