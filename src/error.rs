//! Error types for the ZeptoMail client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for all ZeptoMail client operations.
///
/// The variants fall into three groups, which callers can tell apart with
/// [`Error::is_transport`], [`Error::is_api`] and [`Error::is_parse`]:
///
/// - the request never completed ([`Error::Request`], [`Error::Cancelled`],
///   [`Error::Serialize`]),
/// - the server rejected it ([`Error::Api`]),
/// - the server accepted it but the success body was malformed
///   ([`Error::ResponseParse`]).
///
/// [`Error::InvalidIdentifier`] and [`Error::Config`] are raised locally and
/// belong to none of them.
#[derive(Debug, Error)]
pub enum Error {
    /// Network, TLS, timeout or body-read failure from the HTTP client.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The request was aborted through the client's cancellation token.
    #[error("request cancelled")]
    Cancelled,
    /// The request body could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
    /// ZeptoMail answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A 2xx body did not match the expected response shape.
    #[error("failed to parse response: {0}")]
    ResponseParse(#[source] serde_json::Error),
    /// A mail agent alias or template key cannot be used as one path
    /// segment (empty, `.` or `..`).
    #[error("invalid path identifier: {0:?}")]
    InvalidIdentifier(String),
    /// The client could not be constructed from the given settings.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// `true` when the provider rejected the request.
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    /// `true` when the request never produced a valid HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Request(_) | Error::Cancelled | Error::Serialize(_)
        )
    }

    /// `true` when a successful response could not be decoded.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::ResponseParse(_))
    }

    /// `true` when the HTTP client gave up because the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Request(err) if err.is_timeout())
    }

    /// Borrow the provider error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// One entry of the `details` array in a ZeptoMail error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable reason, e.g. `REQUIRED`.
    #[serde(default)]
    pub code: String,
    /// Human-readable explanation.
    #[serde(default)]
    pub message: String,
    /// Request field the detail refers to, e.g. `to`.
    #[serde(default)]
    pub target: String,
}

/// Error returned when ZeptoMail responds with a non-2xx status.
///
/// Structured error bodies are decoded into `code`, `message`, `details` and
/// `request_id`. Anything else (HTML from a proxy, an empty body, JSON without
/// an error code) becomes a generic error whose `code` is the HTTP reason
/// phrase and whose `message` is the raw body, cut to 512 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub http_status: u16,
    /// Provider error code, e.g. `INVALID_DATA`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-level details, in the order the provider sent them.
    pub details: Vec<ErrorDetail>,
    /// Request id for support tickets, when the provider sent one.
    pub request_id: Option<String>,
}

impl ApiError {
    /// The HTTP status as a typed [`StatusCode`].
    ///
    /// Falls back to `500 Internal Server Error` for values outside 100..=999.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// `true` for 4xx statuses.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status)
    }

    /// `true` for 5xx statuses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.http_status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {} - {}", self.http_status, self.code, self.message)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {request_id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
