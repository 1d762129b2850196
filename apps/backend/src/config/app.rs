//! Process configuration read from the environment at startup.

use std::env;
use std::str::FromStr;

use db_infra::config::db::DbKind;

use crate::error::AppError;
use crate::middleware::cors::parse_origins;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3333;
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
    pub expose_internal_errors: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'")))?,
            Err(_) => DEFAULT_PORT,
        };

        let db_kind = match env::var("PORTFOLIO_DB_KIND") {
            Ok(raw) => DbKind::from_str(&raw)?,
            Err(_) => DbKind::Postgres,
        };

        let expose_internal_errors = match env::var("EXPOSE_INTERNAL_ERRORS") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                AppError::config(format!("EXPOSE_INTERNAL_ERRORS must be true or false, got '{raw}'"))
            })?,
            Err(_) => false,
        };

        let mut cors_allowed_origins =
            parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        if cors_allowed_origins.is_empty() {
            cors_allowed_origins.push(DEFAULT_ORIGIN.to_string());
        }

        Ok(Self {
            host,
            port,
            db_kind,
            expose_internal_errors,
            cors_allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
