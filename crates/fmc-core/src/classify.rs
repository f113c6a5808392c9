//! Response classification.
//!
//! Every response the controller sends goes through [`classify`], which turns
//! the raw status, headers and body into an [`Outcome`]. The function is pure:
//! the same response always yields the same outcome, whatever happened before.
//!
//! 400 responses carry a list of error messages. The controller uses them to
//! report conflicts that callers want to tell apart (duplicate names, duplicate
//! routes, deletion of a referenced object), so the messages are scanned in the
//! order the server returned them and the first one matching a known pattern
//! decides the outcome. When nothing matches, the whole body is kept.

use crate::error::Error;
use bytes::Bytes;
use reqwest::header::{HeaderMap, LOCATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DUPLICATE_PATTERNS: &[&str] = &["Duplicate", "already exists"];
const DUPLICATE_ROUTE_PATTERN: &str = "same interface and gateway in another route";
const DELETION_RESTRICTED_PATTERN: &str = "Object deletion restricted";

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body parsed as JSON.
    Json(Value),
    /// The body is not JSON (e.g. a file download); passed through untouched.
    Raw(Bytes),
    /// 204 No Content. Only the headers carry information.
    NoContent(HeaderMap),
}

impl Payload {
    /// Returns the response headers of a 204 payload.
    #[must_use]
    pub const fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::NoContent(headers) => Some(headers),
            _ => None,
        }
    }
}

/// Typed interpretation of one HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Any 2xx.
    Success(Payload),
    /// 3xx.
    Redirect {
        /// Status code.
        status: u16,
        /// `Location` header, when present.
        location: Option<String>,
    },
    /// 400 whose message mentions a duplicate or an existing object.
    DuplicateObject(String),
    /// 400 reporting a route with the same interface and gateway.
    DuplicateStaticRoute(String),
    /// 400 reporting a referenced object that cannot be deleted.
    DeletionRestricted(String),
    /// 401.
    AuthError,
    /// 404.
    NotFound,
    /// 405.
    Unsupported,
    /// 422, with the raw body.
    ValidationError(String),
    /// 429.
    RateLimited {
        /// Parsed `Retry-After` header (seconds form only).
        retry_after: Option<Duration>,
    },
    /// Everything else, including unmatched 400s and 403.
    OtherHttpError {
        /// Status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

impl Outcome {
    /// Returns true for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Converts the outcome into the payload or the matching [`Error`].
    ///
    /// `endpoint` is only used to give the error some context.
    ///
    /// # Errors
    ///
    /// Returns the [`Error`] variant corresponding to every non-success outcome.
    pub fn into_payload(self, endpoint: &str) -> Result<Payload, Error> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Redirect { status, location } => Err(Error::UnexpectedRedirect {
                status,
                location: location.unwrap_or_default(),
            }),
            Self::DuplicateObject(message) => Err(Error::DuplicateObject(message)),
            Self::DuplicateStaticRoute(message) => Err(Error::DuplicateStaticRoute(message)),
            Self::DeletionRestricted(message) => Err(Error::DeletionRestricted(message)),
            Self::AuthError => Err(Error::Auth(format!(
                "token rejected by {endpoint}; log in again"
            ))),
            Self::NotFound => Err(Error::NotFound(endpoint.to_string())),
            Self::Unsupported => Err(Error::Unsupported(endpoint.to_string())),
            Self::ValidationError(body) => Err(Error::ValidationError(body)),
            Self::RateLimited { retry_after } => Err(Error::RateLimited { retry_after }),
            Self::OtherHttpError { status: 403, body } => Err(Error::Forbidden(body)),
            Self::OtherHttpError { status, body } => Err(Error::HttpStatus { status, body }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorEnvelope,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    messages: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    #[serde(default)]
    description: Option<String>,
}

/// Classifies a raw HTTP response.
///
/// Never fails: a body that cannot be parsed degrades to [`Payload::Raw`] on
/// success statuses and to [`Outcome::OtherHttpError`] on 400.
#[must_use]
pub fn classify(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Outcome {
    match status.as_u16() {
        204 => Outcome::Success(Payload::NoContent(headers.clone())),
        200..=299 => Outcome::Success(decode_success_body(body)),
        300..=399 => Outcome::Redirect {
            status: status.as_u16(),
            location: headers
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        },
        400 => classify_bad_request(body),
        401 => Outcome::AuthError,
        404 => Outcome::NotFound,
        405 => Outcome::Unsupported,
        422 => Outcome::ValidationError(body_text(body)),
        429 => Outcome::RateLimited {
            retry_after: parse_retry_after(headers),
        },
        other => Outcome::OtherHttpError {
            status: other,
            body: body_text(body),
        },
    }
}

fn decode_success_body(body: &[u8]) -> Payload {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Raw(Bytes::copy_from_slice(body)),
    }
}

fn classify_bad_request(body: &[u8]) -> Outcome {
    let messages = serde_json::from_slice::<ErrorBody>(body)
        .map(|parsed| parsed.error.messages)
        .unwrap_or_default();

    for description in messages.into_iter().filter_map(|m| m.description) {
        if DUPLICATE_PATTERNS
            .iter()
            .any(|pattern| description.contains(pattern))
        {
            return Outcome::DuplicateObject(description);
        }
        if description.contains(DUPLICATE_ROUTE_PATTERN) {
            return Outcome::DuplicateStaticRoute(description);
        }
        if description.contains(DELETION_RESTRICTED_PATTERN) {
            return Outcome::DeletionRestricted(description);
        }
    }

    Outcome::OtherHttpError {
        status: 400,
        body: body_text(body),
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
