//! Unified error handling for the admin dashboards.
//!
//! Mirrors the storefront's `AppError` but adds a `Forbidden` class for
//! role-gate violations. Server-side classes are captured to Sentry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use adas_kitchen_backend::{DocstoreError, IdentityError};

/// Application-level error type for the admin dashboards.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document-store operation failed.
    #[error("Document store error: {0}")]
    Docstore(#[from] DocstoreError),

    /// Identity-provider operation failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Staff member lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Docstore(_) | Self::Identity(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Docstore(DocstoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Docstore(_) | Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Docstore(DocstoreError::NotFound(_)) | Self::NotFound(_) => {
                "Not found".to_string()
            }
            Self::Docstore(_) => "Document store unreachable".to_string(),
            Self::Identity(_) => "Sign-in service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_status() {
        let response = AppError::Forbidden("admin role required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_bad_request_keeps_message() {
        let err = AppError::BadRequest("price must be a decimal".to_string());
        assert_eq!(err.to_string(), "Bad request: price must be a decimal");
    }
}
