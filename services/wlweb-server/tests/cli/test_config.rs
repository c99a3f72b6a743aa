//! Tests for show-config and completions

use clap::Parser;
use clap_complete::Shell;
use serial_test::serial;
use wlweb::cli::commands::completions::write_completions;
use wlweb::cli::commands::config::{execute, ConfigResponse};
use wlweb::cli::commands::ConfigArgs;
use wlweb::cli::{Cli, Commands, OutputFormat};
use wlweb::core::config::Config;
use wlweb::core::xdg::XdgDirs;

#[test]
fn test_show_config_human() {
    let result = execute(ConfigArgs::default(), &Config::default(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json() {
    let result = execute(ConfigArgs::default(), &Config::default(), OutputFormat::Json);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_path_only() {
    let result = execute(ConfigArgs { path: true }, &Config::default(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_config_response_serialization() {
    let dir = tempfile::TempDir::new().unwrap();
    let xdg = XdgDirs {
        config_dir: dir.path().to_path_buf(),
    };

    let response = ConfigResponse::new(&Config::default(), &xdg);
    assert!(!response.config_file_exists);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["settings"]["server"]["port"], 18000);
    assert_eq!(json["settings"]["kernel"]["poolsize"], 1);
    assert!(json["config_file"]
        .as_str()
        .unwrap()
        .ends_with("config.toml"));
}

/// A config file in the XDG directory is picked up and reported
#[test]
#[serial]
fn test_config_file_from_xdg_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[server]\nport = 8080\n\n[kernel]\npath = \"/opt/WolframKernel\"\npoolsize = 2\n",
    )
    .unwrap();
    let xdg = XdgDirs {
        config_dir: dir.path().to_path_buf(),
    };

    let config = Config::load_with_xdg(&xdg).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.kernel.path, "/opt/WolframKernel");
    assert_eq!(config.kernel.poolsize, 2);

    let response = ConfigResponse::new(&config, &xdg);
    assert!(response.config_file_exists);
}

#[test]
#[serial]
fn test_invalid_config_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[kernel]\npoolsize = 0\n").unwrap();
    let xdg = XdgDirs {
        config_dir: dir.path().to_path_buf(),
    };

    let config = Config::load_with_xdg(&xdg).unwrap();
    assert_eq!(config.kernel.poolsize, 0);
    assert!(config.validate().is_err());
}

#[test]
fn test_completions_command_parses() {
    let cli = Cli::try_parse_from(["wlweb", "completions", "zsh"]).unwrap();
    match cli.command {
        Commands::Completions(args) => assert_eq!(args.shell, Shell::Zsh),
        other => panic!("expected completions, got {other:?}"),
    }
}

#[test]
fn test_fish_completions_list_commands() {
    let mut out = Vec::new();
    write_completions(Shell::Fish, &mut out).unwrap();

    let script = String::from_utf8(out).unwrap();
    assert!(script.contains("serve"));
    assert!(script.contains("show-config"));
    assert!(script.contains("folder"));
}
