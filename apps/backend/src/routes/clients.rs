//! `/clients` resource.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::db::txn::with_txn;
use crate::error::{AppError, ProblemDetails};
use crate::errors::DomainError;
use crate::extractors::{IncludeQuery, ResourceId, ValidatedJson};
use crate::repos::{Client, ClientPatch, ClientRepo, NewClient, RelatedRepo, Repo};
use crate::state::app_state::AppState;

/// Body of `POST /clients` and `PUT /clients/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientBody {
    /// Required on create.
    #[serde(default, alias = "client_name")]
    pub client_name: Option<String>,
}

impl ClientBody {
    fn into_new(self) -> Result<NewClient, DomainError> {
        let client_name = self
            .client_name
            .ok_or_else(|| DomainError::missing_field("clientName"))?;
        Ok(NewClient { client_name })
    }

    fn into_patch(self) -> ClientPatch {
        ClientPatch {
            client_name: self.client_name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    params(("include" = Option<String>, Query, description = "`portfolios` adds each client's portfolios")),
    responses(
        (status = 200, description = "Every client", body = Vec<Client>),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn list_clients(
    http_req: HttpRequest,
    include: IncludeQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if include.expand(ClientRepo::RELATED_FIELD)? {
        let clients = with_txn(Some(&http_req), &app_state, |txn| {
            Box::pin(async move { Ok(ClientRepo::all_with_related(txn).await?) })
        })
        .await?;
        return Ok(HttpResponse::Ok().json(clients));
    }

    let clients = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(ClientRepo::all(txn).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(clients))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    params(
        ("id" = i64, Path, description = "Client id"),
        ("include" = Option<String>, Query, description = "`portfolios` adds the client's portfolios"),
    ),
    responses(
        (status = 200, description = "The client", body = Client),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such client", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn get_client(
    http_req: HttpRequest,
    id: ResourceId,
    include: IncludeQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();

    if include.expand(ClientRepo::RELATED_FIELD)? {
        let client = with_txn(Some(&http_req), &app_state, |txn| {
            Box::pin(async move {
                ClientRepo::find_with_related(txn, id)
                    .await?
                    .ok_or_else(|| AppError::from(ClientRepo::not_found(id)))
            })
        })
        .await?;
        return Ok(HttpResponse::Ok().json(client));
    }

    let client = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(ClientRepo::require(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(client))
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    request_body = ClientBody,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "clientName missing", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn create_client(
    http_req: HttpRequest,
    body: ValidatedJson<ClientBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new()?;

    let client = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(ClientRepo::create(txn, new).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(client))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i64, Path, description = "Client id")),
    request_body = ClientBody,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such client", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn update_client(
    http_req: HttpRequest,
    id: ResourceId,
    body: ValidatedJson<ClientBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();
    let patch = body.into_inner().into_patch();

    let client = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(ClientRepo::merge_save(txn, id, patch).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(client))
}

/// Pivot rows linking the client go with it.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "clients",
    params(("id" = i64, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "No such client", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn delete_client(
    http_req: HttpRequest,
    id: ResourceId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(ClientRepo::delete(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_clients))
            .route(web::post().to(create_client)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_client))
            .route(web::put().to(update_client))
            .route(web::delete().to(delete_client)),
    );
}
