//! Adapter tests for clients_sea.

use std::time::Duration;

use portfolio_backend::adapters::clients_sea::{self, ClientCreate, ClientUpdate};
use portfolio_backend::adapters::portfolio_clients_sea;
use portfolio_backend::adapters::portfolios_sea::{self, PortfolioCreate};
use portfolio_backend::db::txn::with_txn;
use portfolio_backend::error::AppError;

use crate::support::build_test_state;

#[tokio::test]
async fn find_all_is_ordered_by_id() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            for name in ["Wesfarmers", "Amcor", "Telstra"] {
                clients_sea::create_client(txn, ClientCreate::new(name)).await?;
            }

            let all = clients_sea::find_all(txn).await?;
            let names: Vec<_> = all.iter().map(|c| c.client_name.as_str()).collect();
            assert_eq!(names, vec!["Wesfarmers", "Amcor", "Telstra"]);
            assert!(all.windows(2).all(|w| w[0].id < w[1].id));

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn update_changes_name_and_refreshes_updated_at() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let created = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            tokio::time::sleep(Duration::from_millis(20)).await;
            let updated = clients_sea::update_client(
                txn,
                ClientUpdate {
                    id: created.id,
                    client_name: "Acme Holdings".into(),
                },
            )
            .await?;

            assert_eq!(updated.id, created.id);
            assert_eq!(updated.client_name, "Acme Holdings");
            assert_eq!(updated.created_at, created.created_at);
            assert!(updated.updated_at > created.updated_at);

            let stored = clients_sea::find_by_id(txn, created.id)
                .await?
                .expect("client should exist");
            assert_eq!(stored.updated_at, updated.updated_at);

            Ok::<_, AppError>(())
        })
    })
    .await
}

#[tokio::test]
async fn with_portfolios_loads_linked_rows_only() -> Result<(), AppError> {
    let state = build_test_state().await?;

    with_txn(None, &state, |txn| {
        Box::pin(async move {
            let acme = clients_sea::create_client(txn, ClientCreate::new("Acme")).await?;
            let lonely = clients_sea::create_client(txn, ClientCreate::new("Lonely")).await?;
            let growth = portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Growth")).await?;
            portfolios_sea::create_portfolio(txn, PortfolioCreate::new("Unrelated")).await?;
            portfolio_clients_sea::attach(txn, growth.id, acme.id).await?;

            let (client, portfolios) = clients_sea::find_by_id_with_portfolios(txn, acme.id)
                .await?
                .expect("client exists");
            assert_eq!(client.id, acme.id);
            assert_eq!(portfolios.len(), 1);
            assert_eq!(portfolios[0].portfolio_name, "Growth");

            let all = clients_sea::find_all_with_portfolios(txn).await?;
            assert_eq!(all.len(), 2);
            let (_, lonely_portfolios) = all
                .iter()
                .find(|(c, _)| c.id == lonely.id)
                .expect("lonely client listed");
            assert!(lonely_portfolios.is_empty());

            assert!(clients_sea::find_by_id_with_portfolios(txn, 999)
                .await?
                .is_none());

            Ok::<_, AppError>(())
        })
    })
    .await
}
