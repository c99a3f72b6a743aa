//! Router for `wlweb serve`
//!
//! A single wildcard route answers every method and path. When a folder
//! is served, the request path is looked up there first: kernel scripts
//! are evaluated through `Get`, other files are sent as static assets.
//! Everything else falls back to the fixed handler expression.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::core::error::{Result, WlwebError};
use crate::core::explorer::{self, FolderEntry};
use crate::core::expr::Expr;
use crate::core::handler;
use crate::core::services::Services;
use crate::http::middleware::log_request;
use crate::http::view::wl_view;

/// Shared state of the wildcard route
#[derive(Clone)]
pub struct AppState {
    pub services: Services,

    /// Expression answered when no folder entry matches
    pub handler: Arc<Expr>,

    /// Folder of kernel scripts and assets, already expanded
    pub folder: Option<Arc<PathBuf>>,

    /// Re-read folder scripts on every request
    pub autoreload: bool,
}

impl AppState {
    pub fn new(services: Services, handler: Expr) -> Self {
        Self {
            services,
            handler: Arc::new(handler),
            folder: None,
            autoreload: false,
        }
    }

    pub fn with_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.folder = folder.map(Arc::new);
        self
    }

    pub fn with_autoreload(mut self, autoreload: bool) -> Self {
        self.autoreload = autoreload;
        self
    }
}

/// Build the router: one route for all methods and paths
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(wildcard_handler))
        .route("/*tail", any(wildcard_handler))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Answer any request from the folder or the fixed handler
pub async fn wildcard_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response> {
    let entry = state.folder.as_deref().and_then(|folder| {
        explorer::lookup(
            folder,
            request.uri().path(),
            &state.services.config.explorer.index,
        )
    });

    let expr = match entry {
        Some(FolderEntry::Static(path)) => return serve_static(&path, request).await,
        Some(FolderEntry::Script(path)) => {
            debug!(path = %path.display(), "Serving folder script");
            handler::folder_script(&path, state.autoreload)
        }
        None => Expr::clone(&state.handler),
    };

    wl_view(state.services.evaluator.as_ref(), expr, request).await
}

async fn serve_static(path: &Path, request: Request<Body>) -> Result<Response> {
    debug!(path = %path.display(), "Serving static file");

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .map_err(|e| WlwebError::IoError(std::io::Error::other(e)))?;

    Ok(response.map(Body::new))
}
