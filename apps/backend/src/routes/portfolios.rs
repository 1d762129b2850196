//! `/portfolios` resource and the client attach endpoint.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

use crate::db::txn::with_txn;
use crate::error::{AppError, ProblemDetails};
use crate::errors::{DomainError, ErrorCode};
use crate::extractors::{IncludeQuery, ResourceId, ValidatedJson};
use crate::repos::{NewPortfolio, Portfolio, PortfolioPatch, PortfolioRepo, RelatedRepo, Repo};
use crate::services::PortfolioService;
use crate::state::app_state::AppState;

/// Body of `POST /portfolios` and `PUT /portfolios/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioBody {
    /// Required on create.
    #[serde(default, alias = "portfolio_name")]
    pub portfolio_name: Option<String>,
}

impl PortfolioBody {
    fn into_new(self) -> Result<NewPortfolio, DomainError> {
        let portfolio_name = self
            .portfolio_name
            .ok_or_else(|| DomainError::missing_field("portfolioName"))?;
        Ok(NewPortfolio { portfolio_name })
    }

    fn into_patch(self) -> PortfolioPatch {
        PortfolioPatch {
            portfolio_name: self.portfolio_name,
        }
    }
}

#[utoipa::path(
    get,
    path = "/portfolios",
    tag = "portfolios",
    params(("include" = Option<String>, Query, description = "`clients` adds each portfolio's clients")),
    responses(
        (status = 200, description = "Every portfolio", body = Vec<Portfolio>),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn list_portfolios(
    http_req: HttpRequest,
    include: IncludeQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if include.expand(PortfolioRepo::RELATED_FIELD)? {
        let portfolios = with_txn(Some(&http_req), &app_state, |txn| {
            Box::pin(async move { Ok(PortfolioRepo::all_with_related(txn).await?) })
        })
        .await?;
        return Ok(HttpResponse::Ok().json(portfolios));
    }

    let portfolios = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PortfolioRepo::all(txn).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(portfolios))
}

#[utoipa::path(
    get,
    path = "/portfolios/{id}",
    tag = "portfolios",
    params(
        ("id" = i64, Path, description = "Portfolio id"),
        ("include" = Option<String>, Query, description = "`clients` adds the portfolio's clients"),
    ),
    responses(
        (status = 200, description = "The portfolio", body = Portfolio),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such portfolio", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn get_portfolio(
    http_req: HttpRequest,
    id: ResourceId,
    include: IncludeQuery,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();

    if include.expand(PortfolioRepo::RELATED_FIELD)? {
        let portfolio = with_txn(Some(&http_req), &app_state, |txn| {
            Box::pin(async move {
                PortfolioRepo::find_with_related(txn, id)
                    .await?
                    .ok_or_else(|| AppError::from(PortfolioRepo::not_found(id)))
            })
        })
        .await?;
        return Ok(HttpResponse::Ok().json(portfolio));
    }

    let portfolio = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PortfolioRepo::require(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(portfolio))
}

#[utoipa::path(
    post,
    path = "/portfolios",
    tag = "portfolios",
    request_body = PortfolioBody,
    responses(
        (status = 201, description = "Portfolio created", body = Portfolio),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "portfolioName missing", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn create_portfolio(
    http_req: HttpRequest,
    body: ValidatedJson<PortfolioBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let new = body.into_inner().into_new()?;

    let portfolio = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PortfolioRepo::create(txn, new).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(portfolio))
}

#[utoipa::path(
    put,
    path = "/portfolios/{id}",
    tag = "portfolios",
    params(("id" = i64, Path, description = "Portfolio id")),
    request_body = PortfolioBody,
    responses(
        (status = 200, description = "Portfolio updated", body = Portfolio),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "No such portfolio", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn update_portfolio(
    http_req: HttpRequest,
    id: ResourceId,
    body: ValidatedJson<PortfolioBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();
    let patch = body.into_inner().into_patch();

    let portfolio = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PortfolioRepo::merge_save(txn, id, patch).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(portfolio))
}

#[utoipa::path(
    delete,
    path = "/portfolios/{id}",
    tag = "portfolios",
    params(("id" = i64, Path, description = "Portfolio id")),
    responses(
        (status = 204, description = "Portfolio deleted"),
        (status = 404, description = "No such portfolio", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn delete_portfolio(
    http_req: HttpRequest,
    id: ResourceId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = id.get();

    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { Ok(PortfolioRepo::delete(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ids of an attach request, read from the raw body so it can be echoed back.
///
/// `client_id` / `portfolio_id` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AttachRequest {
    pub client_id: i64,
    pub portfolio_id: i64,
}

impl AttachRequest {
    pub fn from_json(input: &Value) -> Result<Self, AppError> {
        let Some(fields) = input.as_object() else {
            return Err(AppError::bad_request(
                ErrorCode::BadRequest,
                "Request body must be a JSON object",
            ));
        };

        Ok(Self {
            client_id: id_field(fields, "clientId", "client_id")?,
            portfolio_id: id_field(fields, "portfolioId", "portfolio_id")?,
        })
    }
}

fn id_field(fields: &Map<String, Value>, name: &str, alias: &str) -> Result<i64, AppError> {
    let value = fields
        .get(name)
        .or_else(|| fields.get(alias))
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::from(DomainError::missing_field(name)))?;

    value.as_i64().ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Field '{name}' must be an integer"),
        )
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttachResponse {
    /// `Client added to portfolio` or `Client already in portfolio`
    #[schema(value_type = String)]
    pub message: &'static str,
    pub portfolio: Portfolio,
}

/// Every failure echoes the request body back as `inputData`.
#[utoipa::path(
    post,
    path = "/add-client-to-portfolio",
    tag = "portfolios",
    request_body = AttachRequest,
    responses(
        (status = 201, description = "Client linked; repeating the call is a no-op", body = AttachResponse),
        (status = 400, description = "Malformed request", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 404, description = "Client or portfolio missing", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 422, description = "clientId or portfolioId missing", body = ProblemDetails, content_type = "application/problem+json"),
        (status = 500, description = "Link could not be stored", body = ProblemDetails, content_type = "application/problem+json"),
    )
)]
pub async fn attach_client(
    http_req: HttpRequest,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let req = AttachRequest::from_json(&input).map_err(|e| e.with_input(input.clone()))?;

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PortfolioService::new()
                .attach_client(txn, req.client_id, req.portfolio_id)
                .await?)
        })
    })
    .await
    .map_err(|e| attach_failure(e, input))?;

    Ok(HttpResponse::Created().json(AttachResponse {
        message: outcome.message(),
        portfolio: outcome.portfolio,
    }))
}

/// Generic storage failures become ATTACH_FAILED; the rest keep their code.
fn attach_failure(err: AppError, input: Value) -> AppError {
    let err = match err {
        AppError::Db { internal, .. } | AppError::Internal { internal, .. } => {
            warn!(internal = internal.as_deref().unwrap_or(""), "attach failed");
            AppError::internal(
                ErrorCode::AttachFailed,
                "Failed to add client to portfolio",
                internal,
            )
        }
        other => other,
    };
    err.with_input(input)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_portfolios))
            .route(web::post().to(create_portfolio)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_portfolio))
            .route(web::put().to(update_portfolio))
            .route(web::delete().to(delete_portfolio)),
    );
}
