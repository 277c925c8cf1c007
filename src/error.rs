//! Error types for the validation API
//!
//! Request-level failures are reported to the caller as
//! `{"status": "error", "message": ...}` and never affect other requests.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by the `/validate` endpoint
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body is not JSON or does not match the address schema (HTTP 417)
    #[error("{0}")]
    RequestShapeInvalid(String),

    /// The external validation service could not be reached or decoded (HTTP 503)
    #[error("{0}")]
    UpstreamUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RequestShapeInvalid(_) => StatusCode::EXPECTATION_FAILED,
            ApiError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Wire shape of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: "error",
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failure talking to the external validation service.
///
/// Transport errors, timeouts, error statuses and undecodable bodies all land
/// here; callers only distinguish "got an answer" from "did not".
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to validation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("validation service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("validation service returned an invalid body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::RequestShapeInvalid("bad".into()).status_code(),
            StatusCode::EXPECTATION_FAILED
        );
        assert_eq!(
            ApiError::UpstreamUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_message_is_passed_through() {
        let err = ApiError::RequestShapeInvalid("\"StreetName\" is a required property".into());
        assert_eq!(err.to_string(), "\"StreetName\" is a required property");
    }
}
