use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use portfolio_backend::AppError;
use serde_json::json;

use crate::common::{assert_problem, json_body, timestamp};
use crate::support::{build_test_state, create_test_app, factory};

#[actix_web::test]
async fn create_then_get_returns_same_fields() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/clients")
        .set_json(json!({"clientName": "Acme"}))
        .to_request();
    let created = json_body(test::call_service(&app, req).await, StatusCode::CREATED).await;

    let id = created["id"].as_i64().expect("numeric id");
    assert!(id > 0);
    assert_eq!(created["clientName"], "Acme");
    assert!(created["createdAt"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(created["updatedAt"].as_str().is_some_and(|s| !s.is_empty()));

    let req = test::TestRequest::get()
        .uri(&format!("/clients/{id}"))
        .to_request();
    let fetched = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(fetched, created);
    Ok(())
}

#[actix_web::test]
async fn list_returns_all_clients_in_id_order() -> Result<(), AppError> {
    let state = build_test_state().await?;
    factory::create_client(&state, "BHP").await?;
    factory::create_client(&state, "Telstra").await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/clients").to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;

    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["clientName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["BHP", "Telstra"]);
    assert!(body[0].get("portfolios").is_none());
    Ok(())
}

#[actix_web::test]
async fn create_without_name_is_missing_field() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    for payload in [json!({}), json!({"clientName": null})] {
        let req = test::TestRequest::post()
            .uri("/clients")
            .set_json(payload)
            .to_request();
        let problem = assert_problem(
            test::call_service(&app, req).await,
            StatusCode::UNPROCESSABLE_ENTITY,
            "MISSING_FIELD",
        )
        .await;
        assert_eq!(problem.detail, "Field 'clientName' is required");
    }
    Ok(())
}

#[actix_web::test]
async fn update_merges_and_keeps_created_at() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let client = factory::create_client(&state, "Acme").await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/clients/{}", client.id))
        .set_json(json!({"client_name": "Acme Holdings"}))
        .to_request();
    let updated = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["clientName"], "Acme Holdings");
    assert_eq!(updated["id"], client.id);
    assert_eq!(timestamp(&updated, "createdAt"), client.created_at);
    assert!(timestamp(&updated, "updatedAt") > client.updated_at);
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Empty body keeps the fields but still counts as a write.
    let req = test::TestRequest::put()
        .uri(&format!("/clients/{}", client.id))
        .set_json(json!({}))
        .to_request();
    let unchanged = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(unchanged["clientName"], "Acme Holdings");
    assert_eq!(unchanged["createdAt"], updated["createdAt"]);
    assert!(timestamp(&unchanged, "updatedAt") > timestamp(&updated, "updatedAt"));
    Ok(())
}

#[actix_web::test]
async fn update_missing_client_is_not_found() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::put()
        .uri("/clients/999")
        .set_json(json!({"clientName": "Ghost"}))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "CLIENT_NOT_FOUND",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn delete_then_get_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let client = factory::create_client(&state, "Acme").await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::delete()
        .uri(&format!("/clients/{}", client.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/clients/{}", client.id))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "CLIENT_NOT_FOUND",
    )
    .await;

    // Deleting again is a 404, not a crash.
    let req = test::TestRequest::delete()
        .uri(&format!("/clients/{}", client.id))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::NOT_FOUND,
        "CLIENT_NOT_FOUND",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn include_portfolios_expands_relation() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let client = factory::create_client(&state, "Acme").await?;
    let growth = factory::create_portfolio(&state, "Growth").await?;
    let income = factory::create_portfolio(&state, "Income").await?;
    factory::link(&state, growth.id, client.id).await?;
    factory::link(&state, income.id, client.id).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri(&format!("/clients/{}?include=portfolios", client.id))
        .to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body["clientName"], "Acme");
    let mut names: Vec<&str> = body["portfolios"]
        .as_array()
        .expect("portfolios array")
        .iter()
        .map(|p| p["portfolioName"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Growth", "Income"]);

    let req = test::TestRequest::get()
        .uri("/clients?include=portfolios")
        .to_request();
    let body = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(body[0]["portfolios"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[actix_web::test]
async fn unknown_include_is_bad_request() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/clients?include=users")
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::BAD_REQUEST,
        "INVALID_INCLUDE",
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn delete_zero_id_is_not_found() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    for uri in ["/clients/0", "/clients/-1"] {
        let req = test::TestRequest::delete().uri(uri).to_request();
        assert_problem(
            test::call_service(&app, req).await,
            StatusCode::NOT_FOUND,
            "CLIENT_NOT_FOUND",
        )
        .await;
    }
    Ok(())
}
