//! CLI adapter for wlweb
//!
//! Provides the command-line interface that launches the kernel-backed
//! HTTP server and inspects its configuration.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      http/       |
//!              |  (axum adapter)  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// wlweb - Wolfram Language kernels over HTTP
///
/// Launch an HTTP server whose every request is answered by a pool of
/// Wolfram Language kernels.
#[derive(Parser, Debug)]
#[command(name = "wlweb")]
#[command(version)]
#[command(about = "Serve Wolfram Language kernels over HTTP", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output for scripting
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Human
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(commands::ServeArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  wlweb completions bash > ~/.local/share/bash-completion/completions/wlweb
    ///   zsh:   wlweb completions zsh > ~/.zfunc/_wlweb
    ///   fish:  wlweb completions fish > ~/.config/fish/completions/wlweb.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::ShowConfig(args) => {
            config.validate()?;
            commands::config::execute(args, &config, cli.format)
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
