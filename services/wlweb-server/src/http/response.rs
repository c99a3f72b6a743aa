//! Response conversion
//!
//! The view expression makes the kernel export the generated
//! `HTTPResponse` as compact JSON:
//!
//! ```json
//! {"StatusCode": 200, "Headers": [["Content-Type", "application/json"]], "Body": "<base64>"}
//! ```

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use tracing::warn;

use crate::core::error::{Result, WlwebError};
use crate::core::kernel::Evaluation;

/// Headers the server sets itself
fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::CONTENT_LENGTH
        || *name == header::TRANSFER_ENCODING
        || *name == header::CONNECTION
}

/// `HTTPResponse` as exported by the kernel
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KernelResponse {
    pub status_code: u16,

    #[serde(default)]
    pub headers: Vec<(String, serde_json::Value)>,

    /// Base64 encoded body
    #[serde(default)]
    pub body: String,
}

impl KernelResponse {
    /// Parse the payload produced by the view expression
    pub fn from_evaluation(evaluation: &Evaluation) -> Result<Self> {
        serde_json::from_str(&evaluation.result).map_err(|e| {
            let mut detail = format!("kernel returned {}", truncate(&evaluation.result, 200));
            if !evaluation.messages.is_empty() {
                detail.push_str(&format!(" with messages {:?}", evaluation.messages));
            }
            WlwebError::InvalidKernelResponse(format!("{detail} ({e})"))
        })
    }

    /// Build the HTTP response
    pub fn into_http(self) -> Result<Response> {
        let status = StatusCode::from_u16(self.status_code).map_err(|_| {
            WlwebError::InvalidKernelResponse(format!("invalid status code {}", self.status_code))
        })?;
        let body = STANDARD
            .decode(self.body.as_bytes())
            .map_err(|e| WlwebError::InvalidKernelResponse(format!("invalid body encoding: {e}")))?;

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;

        for (name, value) in self.headers {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) else {
                warn!(header = %name, "Dropping invalid header from kernel");
                continue;
            };
            if is_hop_by_hop(&name) {
                continue;
            }
            response.headers_mut().append(name, value);
        }

        Ok(response)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
