//! wlweb - Wolfram Language kernels over HTTP
//!
//! Serves a pool of Wolfram Language kernel processes behind an HTTP
//! server. Every request is handed to the kernel's
//! `GenerateHTTPResponse` together with a handler expression, and the
//! generated response is sent back to the client.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, xdg
//!   - expr, wl (expression model and builders)
//!   - kernel (sessions, pools, wire protocol)
//!   - handler, explorer (what `serve` answers with)
//!   - services (unified service container)
//!
//! - **http**: Axum adapter (depends on core)
//!   - request/response conversion, view, router, middleware
//!
//! - **cli**: clap adapter (depends on core and http)
//!   - serve, show-config, completions

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP adapter
pub mod http;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, WlwebError};
pub use core::expr::Expr;
pub use core::kernel::{Evaluation, Evaluator, KernelPool, KernelSession};
pub use core::services::Services;
