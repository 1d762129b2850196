//! OpenAPI document for the public API, served at `/api-docs/openapi.json`.

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use super::clients::{self, ClientBody};
use super::portfolios::{self, AttachRequest, AttachResponse, PortfolioBody};
use super::users::{self, UserBody};
use crate::error::ProblemDetails;
use crate::repos::{Client, Portfolio, User};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio API",
        description = "Users, clients and portfolios, and the links between clients and portfolios."
    ),
    paths(
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        portfolios::list_portfolios,
        portfolios::get_portfolio,
        portfolios::create_portfolio,
        portfolios::update_portfolio,
        portfolios::delete_portfolio,
        portfolios::attach_client,
    ),
    components(schemas(
        User,
        Client,
        Portfolio,
        UserBody,
        ClientBody,
        PortfolioBody,
        AttachRequest,
        AttachResponse,
        ProblemDetails
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "clients", description = "Client records"),
        (name = "portfolios", description = "Portfolios and client attachment")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/openapi.json", web::get().to(openapi_json));
}
