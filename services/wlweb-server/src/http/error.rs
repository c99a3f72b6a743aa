//! HTTP status mapping for wlweb errors
//!
//! Failures formatted by the kernel itself (an `APIFunction` rejecting
//! its parameters, say) are ordinary kernel responses and never reach
//! this module; it only covers failures to talk to the kernel at all.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::WlwebError;

impl WlwebError {
    /// Convert error to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            WlwebError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            WlwebError::EvaluationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            WlwebError::KernelStartFailed(_) | WlwebError::KernelTerminated(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            WlwebError::EvaluationFailed(_)
            | WlwebError::InvalidKernelResponse(_)
            | WlwebError::ConfigError(_)
            | WlwebError::IoError(_)
            | WlwebError::TomlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for WlwebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
