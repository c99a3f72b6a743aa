//! HTTP adapter for wlweb
//!
//! Converts incoming requests into `GenerateHTTPResponse` evaluations
//! and kernel payloads back into responses, via the Axum web framework.
//!
//! - **request**: request to kernel association
//! - **response**: kernel payload to HTTP response
//! - **view**: the adapter tying both to an evaluator
//! - **server**: router with the single wildcard route used by `serve`
//! - **middleware**: request logging
//! - **error**: error to HTTP status mapping

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod view;

pub use server::{build_router, AppState};
pub use view::wl_view;
