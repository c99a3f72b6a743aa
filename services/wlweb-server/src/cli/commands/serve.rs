//! Serve command - run the kernel-backed HTTP server

use std::path::PathBuf;

use axum::Router;
use clap::Args;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::config::Config;
use crate::core::handler::create_handler;
use crate::core::services::Services;
use crate::core::xdg::expand_user;
use crate::http::{build_router, AppState};

/// Arguments for the serve command
///
/// Flags left unset fall back to the configuration file and
/// environment (see `show-config`).
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Expressions answered for every request, evaluated in order
    pub expressions: Vec<String>,

    /// File to Get for every request (repeatable)
    #[arg(long = "get", value_name = "PATH")]
    pub get: Vec<String>,

    /// Port to bind [default: 18000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Kernel executable
    #[arg(long, value_name = "PATH")]
    pub kernel: Option<String>,

    /// Number of kernel processes [default: 1]
    #[arg(long)]
    pub poolsize: Option<usize>,

    /// Re-read file-backed content on every request
    #[arg(long)]
    pub autoreload: bool,

    /// Start the kernels immediately instead of on first request
    #[arg(long)]
    pub preload: bool,

    /// Folder of Wolfram Language scripts and assets to serve
    #[arg(long, value_name = "DIR")]
    pub folder: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(kernel) = &self.kernel {
            config.kernel.path = kernel.clone();
        }
        if let Some(poolsize) = self.poolsize {
            config.kernel.poolsize = poolsize;
        }
    }
}

/// Build the application router for `args` on top of `services`
pub fn build_app(args: &ServeArgs, services: Services) -> Router {
    let handler = create_handler(&args.expressions, &args.get, args.autoreload);
    let folder = args.folder.as_ref().map(expand_user);

    let state = AppState::new(services, handler)
        .with_folder(folder)
        .with_autoreload(args.autoreload);

    build_router(state)
}

/// Hook for failures outside of a request
pub fn exception_handler(error: &dyn std::error::Error, context: &str) {
    error!(context = context, error = %error, "Unhandled error");
}

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    args.apply(&mut config);
    config.validate()?;
    config.log_config();

    let services = Services::new(config);
    let app = build_app(&args, services.clone());

    if args.preload {
        let preload = services.preload();
        tokio::spawn(async move {
            match preload.await {
                Ok(Ok(())) => info!("Kernels preloaded"),
                Ok(Err(e)) => exception_handler(&e, "preload"),
                Err(e) => exception_handler(&e, "preload task"),
            }
        });
    }

    let addr = format!("{}:{}", services.config.server.host, services.config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", addr);
    if args.expressions.is_empty() && args.get.is_empty() && args.folder.is_none() {
        warn!("No expressions, --get files or --folder given; every request answers 404");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down kernels");
    services.evaluator.stop().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        exception_handler(&e, "signal handler");
        // Without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C");
}
