use actix_web::{web, App, HttpServer};
use portfolio_backend::config::db::RuntimeEnv;
use portfolio_backend::error::set_expose_internal_errors;
use portfolio_backend::{
    build_state, cors_middleware, routes, telemetry, AppConfig, RequestTrace, StructuredLogger,
    TraceSpan,
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables come from the runtime (docker env_file, or
    // `set -a; . ./.env; set +a` locally).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    set_expose_internal_errors(config.expose_internal_errors);

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(config.db_kind)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let (host, port) = config.bind_addr();
    info!(host = %host, port, db_kind = ?config.db_kind, "starting portfolio backend");

    let data = web::Data::new(app_state);
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
