//! Configuration management for the wlweb service.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Command-line flags are applied on top by the `serve` command.

use crate::core::error::{Result, WlwebError};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Kernel process configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KernelConfig {
    /// Kernel executable
    #[serde(default = "default_kernel_path")]
    pub path: String,

    /// Arguments passed to the kernel executable
    #[serde(default = "default_kernel_args")]
    pub args: Vec<String>,

    /// Number of kernel processes (1 = single session)
    #[serde(default = "default_poolsize")]
    pub poolsize: usize,

    /// Seconds to wait for a kernel to answer its first evaluation
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_sec: u64,

    /// Seconds to wait for a single evaluation
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout_sec: u64,
}

/// Folder explorer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
    /// File evaluated when a request resolves to a directory
    #[serde(default = "default_index")]
    pub index: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    18000
}

/// Platform default location of the kernel executable
pub fn default_kernel_path() -> String {
    if cfg!(target_os = "macos") {
        "/Applications/Mathematica.app/Contents/MacOS/WolframKernel".to_string()
    } else {
        "WolframKernel".to_string()
    }
}

fn default_kernel_args() -> Vec<String> {
    vec!["-noprompt".to_string()]
}

fn default_poolsize() -> usize {
    1
}

fn default_startup_timeout() -> u64 {
    60
}

fn default_evaluation_timeout() -> u64 {
    300
}

fn default_index() -> String {
    "index.wl".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            path: default_kernel_path(),
            args: default_kernel_args(),
            poolsize: default_poolsize(),
            startup_timeout_sec: default_startup_timeout(),
            evaluation_timeout_sec: default_evaluation_timeout(),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| WlwebError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. WLWEB_CONFIG env var
    /// 2. XDG config file (~/.config/wlweb/config.toml)
    /// 3. Defaults
    ///
    /// The result is not validated: commands apply their flags first and
    /// call [`Config::validate`] on the final values.
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("WLWEB_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else {
                Self::default()
            }
        };

        config.merge_env();

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(host) = env::var("WLWEB_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("WLWEB_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        if let Ok(kernel) = env::var("WLWEB_KERNEL") {
            self.kernel.path = kernel;
        }
        if let Ok(poolsize) = env::var("WLWEB_POOLSIZE") {
            if let Ok(size) = poolsize.parse() {
                self.kernel.poolsize = size;
            }
        }
        if let Ok(timeout) = env::var("WLWEB_EVALUATION_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.kernel.evaluation_timeout_sec = t;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.kernel.path.trim().is_empty() {
            return Err(WlwebError::ConfigError(
                "Kernel path must not be empty".to_string(),
            ));
        }

        if self.kernel.poolsize == 0 {
            return Err(WlwebError::ConfigError(
                "Pool size must be non-zero".to_string(),
            ));
        }

        if self.kernel.startup_timeout_sec == 0 || self.kernel.evaluation_timeout_sec == 0 {
            return Err(WlwebError::ConfigError(
                "Kernel timeouts must be non-zero".to_string(),
            ));
        }

        if self.explorer.index.is_empty() || self.explorer.index.contains('/') {
            return Err(WlwebError::ConfigError(
                "Explorer index must be a plain file name".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Bind: {}:{}", self.server.host, self.server.port);
        tracing::info!("  Kernel: {}", self.kernel.path);
        tracing::info!("  Kernel args: {:?}", self.kernel.args);
        tracing::info!("  Pool size: {}", self.kernel.poolsize);
        tracing::info!("  Startup timeout: {}s", self.kernel.startup_timeout_sec);
        tracing::info!(
            "  Evaluation timeout: {}s",
            self.kernel.evaluation_timeout_sec
        );
        tracing::info!("  Folder index: {}", self.explorer.index);
    }
}
