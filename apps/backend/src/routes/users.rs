//! `/users` resource.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::db::txn::with_txn;
use crate::error::{AppError, ProblemDetails};
use crate::errors::DomainError;
use crate::extractors::{ResourceId, ValidatedJson};
use crate::repos::{NewUser, Repo, User, UserPatch, UserRepo};
use crate::state::app_state::AppState;

/// Body of `POST /users` and `PUT /users/{id}`; both names are required on create.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[serde(default, alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name")]
    pub last_name: Option<String>,
    /// Absent: keep. `null`: clear.
    #[schema(value_type = Option<String>)]
    #[serde(
        default,
        alias = "phone_number",
        with = "::serde_with::rust::double_option"
    )]
    pub phone_number: Option<Option<String>>,
}

impl UserBody {
    fn into_new(self) -> Result<NewUser, DomainError> {
        Ok(NewUser {
            first_name: self
                .first_name
                .ok_or_else(|| DomainError::missing_field("firstName"))?,
            last_name: self
                .last_name
                .ok_or_else(|| DomainError::missing_field("lastName"))?,
            phone_number: self.phone_number.flatten(),
        })
    }

    fn into_patch(self) -> UserPatch {
        UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        }
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "Every user", body = Vec<User>))
)]
pub async fn list_users(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(UserRepo::all(txn).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such user", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn get_user(
    http_req: HttpRequest,
    id: ResourceId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();
    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(UserRepo::require(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserBody,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "firstName or lastName missing", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn create_user(
    http_req: HttpRequest,
    body: ValidatedJson<UserBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new()?;
    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(UserRepo::create(txn, new).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserBody,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such user", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn update_user(
    http_req: HttpRequest,
    id: ResourceId,
    body: ValidatedJson<UserBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();
    let patch = body.into_inner().into_patch();
    let user = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(UserRepo::merge_save(txn, id, patch).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn delete_user(
    http_req: HttpRequest,
    id: ResourceId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(UserRepo::delete(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
