use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Deserialize;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Optional `?include=<relation>` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncludeQuery {
    include: Option<String>,
}

impl IncludeQuery {
    /// Whether `relation` was requested. Any other non-empty value is a 400.
    pub fn expand(&self, relation: &str) -> Result<bool, AppError> {
        match self.include.as_deref().map(str::trim) {
            None | Some("") => Ok(false),
            Some(value) if value == relation => Ok(true),
            Some(value) => Err(AppError::bad_request(
                ErrorCode::InvalidInclude,
                format!("Unsupported include '{value}'; expected '{relation}'"),
            )),
        }
    }
}

impl FromRequest for IncludeQuery {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            web::Query::<IncludeQuery>::from_query(req.query_string())
                .map(web::Query::into_inner)
                .map_err(|_| AppError::bad_request(ErrorCode::BadRequest, "Invalid query string")),
        )
    }
}
