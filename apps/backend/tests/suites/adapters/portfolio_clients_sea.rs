//! Adapter tests for the portfolio_clients pivot: conflicts, foreign keys, cascades.

use portfolio_backend::adapters::clients_sea::{self, ClientCreate};
use portfolio_backend::adapters::portfolio_clients_sea;
use portfolio_backend::adapters::portfolios_sea::{self, PortfolioCreate};
use portfolio_backend::db::txn::with_txn;
use portfolio_backend::error::AppError;
use portfolio_backend::entities::portfolio_clients;
use portfolio_backend::errors::domain::{ConflictKind, DomainError, ValidationKind};
use portfolio_backend::infra::db_errors::map_db_err;

use sea_orm::{EntityTrait, Set};

use crate::support::build_test_state;

#[tokio::test]
async fn attach_twice_keeps_one_row() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let client = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            let portfolio =
                portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Growth")).await?;

            assert!(portfolio_clients_sea::attach(txn, portfolio.id, client.id).await?);
            assert!(!portfolio_clients_sea::attach(txn, portfolio.id, client.id).await?);

            assert_eq!(
                portfolio_clients_sea::count_for_portfolio(txn, portfolio.id).await?,
                1
            );
            let pair = portfolio_clients_sea::find_pair(txn, portfolio.id, client.id)
                .await?
                .expect("pivot row");
            assert_eq!(pair.client_id, client.id);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn attach_to_missing_parent_is_constraint_violation() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let client = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;

            let err = portfolio_clients_sea::attach(txn, 999, client.id)
                .await
                .unwrap_err();
            assert!(matches!(
                map_db_err(err),
                DomainError::Validation(ValidationKind::Constraint, _)
            ));

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn duplicate_pivot_insert_is_unique_conflict() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let client = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            let portfolio =
                portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Growth")).await?;
            assert!(portfolio_clients_sea::attach(txn, portfolio.id, client.id).await?);

            let now = time::OffsetDateTime::now_utc();
            let err = portfolio_clients::Entity::insert(portfolio_clients::ActiveModel {
                portfolio_id: Set(portfolio.id),
                client_id: Set(client.id),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .exec_without_returning(txn)
            .await
            .unwrap_err();

            assert_eq!(
                map_db_err(err),
                DomainError::conflict(ConflictKind::Unique, "Unique constraint violation")
            );

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn deleting_client_cascades_pivot_rows() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let client = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            let growth = portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Growth")).await?;
            let income = portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Income")).await?;
            portfolio_clients_sea::attach(txn, growth.id, client.id).await?;
            portfolio_clients_sea::attach(txn, income.id, client.id).await?;
            assert_eq!(portfolio_clients_sea::count_for_client(txn, client.id).await?, 2);

            clients_sea::delete_client(txn, client.id).await?;

            assert_eq!(portfolio_clients_sea::count_for_client(txn, client.id).await?, 0);
            assert_eq!(portfolio_clients_sea::count_for_portfolio(txn, growth.id).await?, 0);
            // Portfolios themselves survive.
            assert!(portfolios_sea::find_by_id(txn, growth.id).await?.is_some());

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn deleting_portfolio_cascades_pivot_rows() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let client = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            let growth = portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Growth")).await?;
            portfolio_clients_sea::attach(txn, growth.id, client.id).await?;

            portfolios_sea::delete_portfolio(txn, growth.id).await?;

            assert!(portfolio_clients_sea::find_pair(txn, growth.id, client.id)
                .await?
                .is_none());
            assert!(clients_sea::find_by_id(txn, client.id).await?.is_some());

            Ok::<_, AppError>(())
        })
    })
    .await
}
