//! Structured errors for remote API failures.
//!
//! [`ApiError`] is the typed form of an HTTP error response. Components use
//! it to make decisions (the retry component asks [`Retryable::is_retryable`],
//! the rate limiter looks at `retry_after`) and applications use it to report
//! actionable messages to operators.

use std::fmt;
use std::time::Duration;

use http::header::RETRY_AFTER;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

/// Type-erased error, used wherever a component accepts application errors
/// without caring about the concrete type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of an error as worth retrying or permanent.
///
/// The retry component consults this to decide whether another attempt can
/// succeed. Implement it for application error types that wrap transport or
/// provider failures.
pub trait Retryable {
    /// Returns `true` if a later attempt of the same operation could succeed.
    fn is_retryable(&self) -> bool;
}

/// An error response from the remote API.
///
/// Carries everything the server told us: the HTTP status, the provider's
/// machine-readable error code, a human-readable message, optional detail
/// text, and the `Retry-After` hint if one was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status of the failed response.
    pub status: StatusCode,
    /// Provider-specific error code, when the response body carried one.
    pub code: Option<String>,
    /// Human-readable description of the failure.
    pub message: String,
    /// Additional detail text from the response body.
    pub details: Option<String>,
    /// Server-requested pause before the next request, from `Retry-After`.
    pub retry_after: Option<Duration>,
}

impl ApiError {
    /// Creates an error with the given status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code: None,
            message: message.into(),
            details: None,
            retry_after: None,
        }
    }

    /// Attaches the provider's error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches detail text.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Records the server-requested pause before the next request.
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Builds an [`ApiError`] from a failed HTTP response.
    ///
    /// The body is expected to be a JSON object with `message` or `error`
    /// plus optional `code` and `details` fields. A body that does not parse
    /// as JSON is preserved verbatim in `details`, and the message falls
    /// back to the status line. A numeric `Retry-After` header is read in
    /// seconds; other forms are ignored.
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Self {
        let mut err = ApiError::new(
            status,
            status.canonical_reason().unwrap_or("unknown error"),
        );

        match serde_json::from_slice::<WireError>(body) {
            Ok(wire) => {
                if let Some(message) = wire.message.filter(|m| !m.is_empty()) {
                    err.message = message;
                } else if let Some(error) = wire.error.filter(|e| !e.is_empty()) {
                    err.message = error;
                }
                err.code = wire.code.filter(|c| !c.is_empty());
                err.details = wire.details.filter(|d| !d.is_empty());
            }
            Err(_) => {
                let raw = String::from_utf8_lossy(body);
                let raw = raw.trim();
                if !raw.is_empty() {
                    err.details = Some(raw.to_string());
                }
            }
        }

        err.retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        err
    }

    /// Returns `true` for 429 Too Many Requests.
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Returns `true` for 401 Unauthorized and 403 Forbidden.
    pub fn is_auth_error(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED || self.status == StatusCode::FORBIDDEN
    }

    /// Returns `true` for 404 Not Found.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// Returns `true` for 400 Bad Request and 422 Unprocessable Entity.
    pub fn is_validation_error(&self) -> bool {
        self.status == StatusCode::BAD_REQUEST || self.status == StatusCode::UNPROCESSABLE_ENTITY
    }

    /// Returns `true` for any 5xx status.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Suggests a remediation for the failure, when one is known.
    pub fn suggestion(&self) -> Option<String> {
        if self.is_rate_limited() {
            return Some(match self.retry_after {
                Some(after) => format!(
                    "rate limited; the server asked for a {}s pause before the next request",
                    after.as_secs()
                ),
                None => {
                    "rate limited; reduce request volume or wait for the limit window to reset"
                        .to_string()
                }
            });
        }
        if self.is_auth_error() {
            return Some(
                "check the API credentials; the token may be expired or missing a required scope"
                    .to_string(),
            );
        }
        if self.is_not_found() {
            return Some(
                "the resource may have been deleted or the identifier is wrong".to_string(),
            );
        }
        if self.is_validation_error() {
            return Some("check the request parameters against the API documentation".to_string());
        }
        if self.is_server_error() {
            return Some(
                "the provider is having trouble; the request is safe to retry later".to_string(),
            );
        }
        None
    }
}

impl Retryable for ApiError {
    /// Rate limits and server errors are worth retrying; everything else
    /// will fail the same way again.
    fn is_retryable(&self) -> bool {
        self.is_rate_limited() || self.is_server_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(
                f,
                "API error {}: {} - {}",
                self.status.as_u16(),
                self.message,
                details
            ),
            None => write!(f, "API error {}: {}", self.status.as_u16(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// JSON shape of an error response body.
#[derive(Deserialize)]
struct WireError {
    error: Option<String>,
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
}
