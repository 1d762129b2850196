use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Numeric `{id}` path segment.
///
/// Only the shape is checked here; ids with no row (zero and negatives
/// included) are reported as not found by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

impl ResourceId {
    pub fn get(self) -> i64 {
        self.0
    }

    fn parse(raw: &str) -> Result<Self, AppError> {
        raw.parse::<i64>().map(Self).map_err(|_| {
            AppError::bad_request(ErrorCode::InvalidId, format!("Invalid id: {raw}"))
        })
    }
}

impl FromRequest for ResourceId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match req.match_info().get("id") {
            Some(raw) => Self::parse(raw),
            None => Err(AppError::bad_request(
                ErrorCode::InvalidId,
                "Missing id in path",
            )),
        })
    }
}
