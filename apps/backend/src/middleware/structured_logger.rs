//! Access log: one `request_completed` event per request.
//!
//! Records the matched route pattern (`/clients/{id}`) rather than the raw
//! path, and the problem `code` when the response carries an [`AppError`].

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn, Level};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

#[derive(Debug)]
struct Completion {
    method: String,
    route: String,
    status: StatusCode,
    duration_us: u64,
    trace_id: String,
    error_code: Option<ErrorCode>,
}

impl Completion {
    fn level(&self) -> Level {
        if self.status.is_server_error() {
            Level::ERROR
        } else if self.status.is_client_error() {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    fn emit(&self) {
        let Self {
            method,
            route,
            status,
            duration_us,
            trace_id,
            error_code,
        } = self;
        let status_code = status.as_u16();
        let code = error_code.map(|c| c.as_str());

        let level = self.level();
        if level == Level::ERROR {
            error!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, error.code = code, message = "request_completed");
        } else if level == Level::WARN {
            warn!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, error.code = code, message = "request_completed");
        } else {
            info!(http.method = %method, http.route = %route, http.status_code = status_code, duration_us, trace_id = %trace_id, error.code = code, message = "request_completed");
        }
    }
}

fn app_error_code(err: &ActixError) -> Option<ErrorCode> {
    err.as_error::<AppError>().map(AppError::code)
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let raw_path = req.path().to_string();
        // Set by RequestTrace, which wraps this middleware.
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, route, error_code) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request().match_pattern(),
                    res.response().error().and_then(app_error_code),
                ),
                Err(err) => (err.as_response_error().status_code(), None, app_error_code(err)),
            };

            Completion {
                method,
                route: route.unwrap_or(raw_path),
                status,
                duration_us: start.elapsed().as_micros() as u64,
                trace_id,
                error_code,
            }
            .emit();

            result
        })
    }
}
