use std::collections::BTreeSet;

use actix_web::http::StatusCode;
use actix_web::test;
use portfolio_backend::AppState;

use crate::common::json_body;
use crate::support::create_test_app;

const METHODS: [&str; 4] = ["get", "post", "put", "delete"];

#[actix_web::test]
async fn openapi_document_lists_every_operation() {
    let app = create_test_app(AppState::without_db())
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let doc = json_body(test::call_service(&app, req).await, StatusCode::OK).await;

    assert!(doc["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
    assert_eq!(doc["info"]["title"], "Portfolio API");

    let paths = doc["paths"].as_object().expect("paths object");
    let operations: BTreeSet<String> = paths
        .iter()
        .flat_map(|(path, item)| {
            METHODS
                .iter()
                .filter(|m| item.get(**m).is_some())
                .map(move |m| format!("{} {path}", m.to_uppercase()))
        })
        .collect();

    let expected: BTreeSet<String> = [
        "GET /users",
        "POST /users",
        "GET /users/{id}",
        "PUT /users/{id}",
        "DELETE /users/{id}",
        "GET /clients",
        "POST /clients",
        "GET /clients/{id}",
        "PUT /clients/{id}",
        "DELETE /clients/{id}",
        "GET /portfolios",
        "POST /portfolios",
        "GET /portfolios/{id}",
        "PUT /portfolios/{id}",
        "DELETE /portfolios/{id}",
        "POST /add-client-to-portfolio",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(operations, expected);
    assert_eq!(operations.len(), 16);

    for schema in ["User", "Client", "Portfolio", "AttachRequest", "ProblemDetails"] {
        assert!(
            doc["components"]["schemas"].get(schema).is_some(),
            "missing schema {schema}"
        );
    }
}

#[actix_web::test]
async fn attach_documents_its_failure_statuses() {
    let app = create_test_app(AppState::without_db())
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let doc = json_body(test::call_service(&app, req).await, StatusCode::OK).await;

    let responses = &doc["paths"]["/add-client-to-portfolio"]["post"]["responses"];
    for status in ["201", "400", "404", "422", "500"] {
        assert!(responses.get(status).is_some(), "missing {status}");
    }
    assert!(responses["404"]["content"]
        .get("application/problem+json")
        .is_some());
}
