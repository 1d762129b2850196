//! Error codes for the portfolio backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the `code` field
//! of problem details responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Client not found
    ClientNotFound,
    /// Portfolio not found
    PortfolioNotFound,
    /// One side of an attach request does not exist
    ClientOrPortfolioNotFound,
    /// General not found error
    NotFound,

    // Request Validation
    /// General validation error (422)
    ValidationError,
    /// Required body field absent or null (422)
    MissingField,
    /// Malformed request (400)
    BadRequest,
    /// Path id is not an integer
    InvalidId,
    /// Unsupported `include` query value
    InvalidInclude,
    /// Request body over the size limit (413)
    PayloadTooLarge,

    // Conflicts
    /// Generic conflict
    Conflict,

    // Operation failures
    /// Pivot insert failed for a reason other than a missing parent
    AttachFailed,

    // System Errors
    /// Database unavailable
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    /// Database error
    DbError,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::PortfolioNotFound => "PORTFOLIO_NOT_FOUND",
            Self::ClientOrPortfolioNotFound => "CLIENT_OR_PORTFOLIO_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::MissingField => "MISSING_FIELD",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidInclude => "INVALID_INCLUDE",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",

            Self::Conflict => "CONFLICT",

            Self::AttachFailed => "ATTACH_FAILED",

            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DbError => "DB_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 18] = [
        Self::UserNotFound,
        Self::ClientNotFound,
        Self::PortfolioNotFound,
        Self::ClientOrPortfolioNotFound,
        Self::NotFound,
        Self::ValidationError,
        Self::MissingField,
        Self::BadRequest,
        Self::InvalidId,
        Self::InvalidInclude,
        Self::PayloadTooLarge,
        Self::Conflict,
        Self::AttachFailed,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DbError,
        Self::InternalError,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
