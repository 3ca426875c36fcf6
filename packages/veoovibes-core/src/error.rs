//! Centralized error types for the veoovibes core library.
//!
//! Vendor failures are `ApiError` (see `vendor::request`); everything the
//! integration surfaces to its host is a `VeoovibesError`, which maps to an HTTP
//! status and renders as a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::vendor::request::ApiError;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code for API responses.
    fn code(&self) -> &'static str;
}

impl ErrorCode for ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http_request_failed",
            Self::HttpStatus { .. } => "http_error_status",
            Self::Rejected { .. } => "api_rejected",
            Self::Decode { .. } => "api_decode_error",
        }
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum VeoovibesError {
    /// A controller call failed.
    #[error("Controller request failed: {0}")]
    Api(#[from] ApiError),

    /// The connectivity check at setup could not list rooms.
    #[error("Cannot connect to controller: {0}")]
    CannotConnect(String),

    /// The first refresh after setup failed; setup should be retried later.
    #[error("Controller not ready: {0}")]
    SetupNotReady(String),

    /// The room id is not in the latest snapshot.
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Client sent an invalid or malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VeoovibesError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.code(),
            Self::CannotConnect(_) => "cannot_connect",
            Self::SetupNotReady(_) => "setup_not_ready",
            Self::RoomNotFound(_) => "room_not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Api(_) | Self::CannotConnect(_) => StatusCode::BAD_GATEWAY,
            Self::SetupNotReady(_) | Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::vendor::request::ApiResult;

/// Convenient Result alias for application-wide operations.
pub type VeoovibesResult<T> = Result<T, VeoovibesError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for VeoovibesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_not_found_maps_to_404() {
        let err = VeoovibesError::RoomNotFound("9".into());
        assert_eq!(err.code(), "room_not_found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejected_call_keeps_vendor_code() {
        let err: VeoovibesError = ApiError::Rejected {
            endpoint: "room_play".into(),
            body: "{\"status\":\"failed\"}".into(),
        }
        .into();
        assert_eq!(err.code(), "api_rejected");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("room_play"));
    }

    #[test]
    fn setup_not_ready_is_unavailable() {
        let err = VeoovibesError::SetupNotReady("first refresh failed".into());
        assert_eq!(err.code(), "setup_not_ready");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
