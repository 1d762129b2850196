use actix_web::web;

pub mod clients;
pub mod docs;
pub mod health;
pub mod portfolios;
pub mod users;

/// Register every endpoint. Shared by `main.rs` and the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes))
        .service(web::scope("/api-docs").configure(docs::configure_routes))
        .service(web::scope("/users").configure(users::configure_routes))
        .service(web::scope("/clients").configure(clients::configure_routes))
        .service(web::scope("/portfolios").configure(portfolios::configure_routes))
        .route(
            "/add-client-to-portfolio",
            web::post().to(portfolios::attach_client),
        );
}
