use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use portfolio_backend::AppError;
use serde_json::{json, Value};

use crate::common::{assert_problem, json_body, timestamp};
use crate::support::{build_test_state, create_test_app, factory};

#[actix_web::test]
async fn create_populates_all_fields() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"firstName": "Ada", "lastName": "Lovelace", "phoneNumber": "0400 111 222"}))
        .to_request();
    let created = json_body(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(created["firstName"], "Ada");
    assert_eq!(created["lastName"], "Lovelace");
    assert_eq!(created["phoneNumber"], "0400 111 222");

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", created["id"]))
        .to_request();
    let fetched = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(fetched, created);
    Ok(())
}

#[actix_web::test]
async fn phone_number_is_optional() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"first_name": "Grace", "last_name": "Hopper"}))
        .to_request();
    let created = json_body(test::call_service(&app, req).await, StatusCode::CREATED).await;
    assert_eq!(created["phoneNumber"], Value::Null);
    Ok(())
}

#[actix_web::test]
async fn create_requires_names() -> Result<(), AppError> {
    let app = create_test_app(build_test_state().await?)
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({"lastName": "Hopper"}))
        .to_request();
    let problem = assert_problem(
        test::call_service(&app, req).await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "MISSING_FIELD",
    )
    .await;
    assert_eq!(problem.detail, "Field 'firstName' is required");
    Ok(())
}

#[actix_web::test]
async fn update_merges_only_provided_fields() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = factory::create_user(&state, "Ada", "Lovelace", Some("0400 111 222")).await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", user.id))
        .set_json(json!({"lastName": "King"}))
        .to_request();
    let updated = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(updated["firstName"], "Ada");
    assert_eq!(updated["lastName"], "King");
    assert_eq!(updated["phoneNumber"], "0400 111 222");
    assert_eq!(timestamp(&updated, "createdAt"), user.created_at);
    assert!(timestamp(&updated, "updatedAt") > user.updated_at);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", user.id))
        .set_json(json!({"phoneNumber": null}))
        .to_request();
    let cleared = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(cleared["phoneNumber"], Value::Null);
    assert_eq!(cleared["lastName"], "King");
    Ok(())
}

#[actix_web::test]
async fn delete_and_missing_user() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let user = factory::create_user(&state, "Ada", "Lovelace", None).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}", user.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    for req in [
        test::TestRequest::get().uri(&format!("/users/{}", user.id)),
        test::TestRequest::delete().uri(&format!("/users/{}", user.id)),
        test::TestRequest::put()
            .uri(&format!("/users/{}", user.id))
            .set_json(json!({"firstName": "X"})),
    ] {
        assert_problem(
            test::call_service(&app, req.to_request()).await,
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
        )
        .await;
    }

    let req = test::TestRequest::get().uri("/users").to_request();
    let listed = json_body(test::call_service(&app, req).await, StatusCode::OK).await;
    assert_eq!(listed, json!([]));
    Ok(())
}
