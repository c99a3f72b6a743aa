//! Core domain logic (protocol-agnostic)
//!
//! This module contains everything that is independent of the HTTP
//! transport.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **expr / wl**: Expression model and builders
//! - **kernel**: Kernel sessions, pools and wire protocol
//! - **handler**: Fixed handler expressions for `serve`
//! - **explorer**: Folder path resolution
//! - **xdg**: XDG directory handling
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod explorer;
pub mod expr;
pub mod handler;
pub mod kernel;
pub mod services;
pub mod wl;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, WlwebError};
pub use expr::Expr;
pub use services::Services;
