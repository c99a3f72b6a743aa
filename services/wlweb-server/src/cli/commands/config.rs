//! Config command - show current configuration

use crate::cli::output::{colors, print_header};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Only print the path of the configuration file
    #[arg(long)]
    pub path: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config_file_exists: bool,
    pub settings: Config,
}

impl ConfigResponse {
    pub fn new(config: &Config, xdg: &XdgDirs) -> Self {
        let config_file = xdg.config_file();
        Self {
            config_file_exists: config_file.exists(),
            config_file: config_file.to_string_lossy().into_owned(),
            settings: config.clone(),
        }
    }
}

/// Execute the config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse::new(config, &XdgDirs::new());

    if args.path {
        println!("{}", response.config_file);
        return Ok(());
    }

    match format {
        OutputFormat::Human => print_human(&response),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_human(response: &ConfigResponse) {
    let settings = &response.settings;
    let file_note = if response.config_file_exists {
        ""
    } else {
        " (not found, using defaults)"
    };

    print_header("Configuration:");
    println!(
        "  config_file: {}{}",
        colors::file_path(&response.config_file),
        colors::dim(file_note)
    );
    println!("  server:");
    println!("    host: {}", settings.server.host);
    println!(
        "    port: {}",
        colors::number(&settings.server.port.to_string())
    );
    println!("  kernel:");
    println!("    path: {}", colors::file_path(&settings.kernel.path));
    println!("    args: {:?}", settings.kernel.args);
    println!(
        "    poolsize: {}",
        colors::number(&settings.kernel.poolsize.to_string())
    );
    println!(
        "    startup_timeout_sec: {}",
        colors::number(&settings.kernel.startup_timeout_sec.to_string())
    );
    println!(
        "    evaluation_timeout_sec: {}",
        colors::number(&settings.kernel.evaluation_timeout_sec.to_string())
    );
    println!("  explorer:");
    println!("    index: {}", settings.explorer.index);
}
