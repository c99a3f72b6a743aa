//! wlweb CLI - serve Wolfram Language kernels over HTTP
//!
//! # Examples
//!
//! ```bash
//! # Answer every request with a fixed expression
//! wlweb serve 'APIFunction[{"x" -> "String"}, Identity, "JSON"]'
//!
//! # Load a file once per kernel, four kernels, start them right away
//! wlweb serve --get app.wl --poolsize 4 --preload
//!
//! # Serve a folder of .wl scripts, re-reading them on every request
//! wlweb serve --folder ~/site --autoreload
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wlweb::cli::{run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wlweb=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
