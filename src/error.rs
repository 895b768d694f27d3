// src/error.rs
//! Application error types.
//!
//! Fetch-level failures abort the whole read; per-block problems never
//! surface here (they become [`crate::model::MalformedBlock`] values).

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "validation_error" => Self::ValidationFailed,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error means the page simply isn't reachable with this token.
    pub fn is_access_problem(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound | Self::Unauthorized | Self::RestrictedResource
        )
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// The listing call answered with a non-success status.
    #[error("Notion API returned {status} ({code})")]
    RemoteFetch {
        status: reqwest::StatusCode,
        code: NotionErrorCode,
        body: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Chat completion failed ({status}): {message}")]
    ChatService {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template render error for template {name}: {message}")]
    TemplateRender { name: String, message: String },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// HTTP status of a failed remote call, if this error carries one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::RemoteFetch { status, .. } | Self::ChatService { status, .. } => Some(*status),
            Self::NetworkFailure(e) => e.status(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(err: handlebars::RenderError) -> Self {
        AppError::TemplateRender {
            name: err.template_name.clone().unwrap_or_else(|| "<inline>".to_string()),
            message: err.to_string(),
        }
    }
}

/// Trims a response body for inclusion in an error without splitting a character.
pub(crate) fn preview_body(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_display() {
        for raw in ["rate_limited", "object_not_found", "restricted_resource"] {
            assert_eq!(NotionErrorCode::from_api_response(raw).to_string(), raw);
        }
        assert_eq!(
            NotionErrorCode::from_api_response("brand_new_code"),
            NotionErrorCode::Unknown("brand_new_code".to_string())
        );
        assert_eq!(NotionErrorCode::from_http_status(502).to_string(), "http_502");
    }

    #[test]
    fn remote_fetch_exposes_its_status() {
        let err = AppError::RemoteFetch {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            code: NotionErrorCode::InternalError,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            err.to_string(),
            "Notion API returned 500 Internal Server Error (internal_server_error)"
        );
    }

    #[test]
    fn preview_cuts_on_char_boundaries() {
        assert_eq!(preview_body("héllo", 2), "hé...");
        assert_eq!(preview_body("short", 10), "short");
    }
}
