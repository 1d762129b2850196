use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use portfolio_backend::AppError;
use serde_json::json;

use crate::common::{assert_problem, json_body, timestamp};
use crate::support::{build_test_state, create_test_app, factory};

#[actix_web::test]
async fn crud_round_trip() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/portfolios")
        .set_json(json!({"portfolioName": "Growth"}))
        .to_request();
    let created = json_body(test::call_service(&app, req).await, StatusCode::CREATED).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["portfolioName"], "Growth");

    let req = test::TestRequest::get()
        .uri(&format!("/portfolios/{id}"))
        .to_request();
    let fetched = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(fetched, created);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/portfolios/{id}"))
        .set_json(json!({"portfolioName": "Aggressive Growth"}))
        .to_request();
    let updated = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["portfolioName"], "Aggressive Growth");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(timestamp(&updated, "updatedAt") > timestamp(&created, "updatedAt"));

    let req = test::TestRequest::get().uri("/portfolios").to_request();
    let listed = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::delete()
        .uri(&format!("/portfolios/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get()
        .uri(&format!("/portfolios/{id}"))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "PORTFOLIO_NOT_FOUND",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn create_without_name_is_missing_field() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/portfolios")
        .set_json(json!({"name": "Growth"}))
        .to_request();
    let problem = assert_problem(
        test::call_service(&app, req).await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "MISSING_FIELD",
    )
    .await;
    assert_eq!(problem.detail, "Field 'portfolioName' is required");
    Ok(())
}

#[actix_web::test]
async fn delete_missing_portfolio_is_not_found() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::delete().uri("/portfolios/42").to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "PORTFOLIO_NOT_FOUND",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn include_clients_expands_relation() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let growth = factory::create_portfolio(&state, "Growth").await?;
    let empty = factory::create_portfolio(&state, "Empty").await?;
    let acme = factory::create_client(&state, "Acme").await?;
    factory::link(&state, growth.id, acme.id).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri(&format!("/portfolios/{}?include=clients", growth.id))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["clients"][0]["clientName"], "Acme");

    let req = test::TestRequest::get()
        .uri(&format!("/portfolios/{}?include=clients", empty.id))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["clients"], json!([]));

    // Not expanded by default.
    let req = test::TestRequest::get()
        .uri(&format!("/portfolios/{}", growth.id))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert!(body.get("clients").is_none());
    Ok(())
}

#[actix_web::test]
async fn include_for_missing_portfolio_is_not_found() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/portfolios/7?include=clients")
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "PORTFOLIO_NOT_FOUND",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn deleting_portfolio_cascades_pivot_rows() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let growth = factory::create_portfolio(&state, "Growth").await?;
    let acme = factory::create_client(&state, "Acme").await?;
    factory::link(&state, growth.id, acme.id).await?;
    let app = create_test_app(state.clone()).with_prod_routes().build().await;

    let req = test::TestRequest::delete()
        .uri(&format!("/portfolios/{}", growth.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    assert_eq!(factory::pivot_rows_for_client(&state, acme.id).await?, 0);
    Ok(())
}
