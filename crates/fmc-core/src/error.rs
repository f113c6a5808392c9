//! Error types for FMC operations.
//!
//! Every failure a caller can observe is one of these variants. HTTP status
//! codes never leak out of the crate on their own: the classifier turns them
//! into a specific category first (see [`crate::classify`]).

use std::time::Duration;
use thiserror::Error;

/// Main error type for FMC operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Connection, TLS or protocol failure below HTTP.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// 401: the access token is missing, invalid or stale.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 403: authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404: unknown endpoint or object.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 405: the endpoint does not support this method.
    #[error("Method not supported: {0}")]
    Unsupported(String),

    /// 400 reporting that an object with the same name or value exists.
    #[error("Duplicate object: {0}")]
    DuplicateObject(String),

    /// 400 reporting a static route with the same interface and gateway.
    #[error("Duplicate static route: {0}")]
    DuplicateStaticRoute(String),

    /// 400 reporting that the object is still referenced and cannot be deleted.
    #[error("Object deletion restricted: {0}")]
    DeletionRestricted(String),

    /// 422: the payload was rejected as invalid input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 429: the controller is throttling this client.
    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited {
        /// Delay requested by the server, when it sent one.
        retry_after: Option<Duration>,
    },

    /// Any other non-success status.
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// Status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The controller answered with a redirect.
    #[error("Unexpected redirect ({status}) to {location}")]
    UnexpectedRedirect {
        /// Status code.
        status: u16,
        /// Redirect target, or an empty string when absent.
        location: String,
    },

    /// A response body could not be decoded into the expected type.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A request needing a token was issued before `login`.
    #[error("Not authenticated: call login() first")]
    NotAuthenticated,

    /// The requested domain is not among those granted at login.
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|delay| format!(" (retry after {}s)", delay.as_secs()))
        .unwrap_or_default()
}

/// Specialized result type for FMC operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unsupported(_) => "UNSUPPORTED",
            Self::DuplicateObject(_) => "DUPLICATE_OBJECT",
            Self::DuplicateStaticRoute(_) => "DUPLICATE_STATIC_ROUTE",
            Self::DeletionRestricted(_) => "DELETION_RESTRICTED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::HttpStatus { .. } => "HTTP_ERROR",
            Self::UnexpectedRedirect { .. } => "UNEXPECTED_REDIRECT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::UnknownDomain(_) => "UNKNOWN_DOMAIN",
        }
    }

    /// Returns true for the "object already exists" family of 400 responses.
    ///
    /// Bulk importers typically skip these and carry on.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateObject(_) | Self::DuplicateStaticRoute(_)
        )
    }

    /// Returns true if the controller throttled the request.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns true if the stored token should be considered stale.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::NotAuthenticated)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
