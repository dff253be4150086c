//! figma-mcp: MCP server exposing Figma files to AI assistants
//!
//! Reads the Figma token from `FIGMA_API_KEY` (or the config file) and serves
//! MCP over stdio.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use figma_mcp::config;
use figma_mcp::figma::FigmaClient;
use figma_mcp::mcp::resources::FilesCache;
use figma_mcp::mcp::server::McpServer;

/// MCP server exposing Figma files, thumbnails and comments to AI assistants.
#[derive(Parser, Debug)]
#[command(name = "figma-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// stdout carries MCP messages, so logs go to stderr.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the figma-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "figma-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting figma-mcp server"
    );

    // A missing token is reported by the first tool call, not here
    let api_key = cfg.resolve_api_key();
    if api_key.is_none() {
        info!("{} is not set; tool calls will fail until it is", config::API_KEY_ENV);
    }

    let files_cache_path = cfg
        .files_cache_path
        .clone()
        .or_else(config::default_files_cache_path);
    info!(files_cache = ?files_cache_path, api_base_url = %cfg.api_base_url, "Configured");

    let client = FigmaClient::with_base_url(api_key, cfg.api_base_url);
    let mut server = McpServer::new(Box::new(client), FilesCache::new(files_cache_path));

    info!("Figma MCP server running on stdio");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(1, false, "error"), Level::INFO);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(5, false, "warn"), Level::TRACE);
    }

    #[test]
    fn log_level_from_config() {
        assert_eq!(get_log_level(0, false, "DEBUG"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "bogus"), Level::WARN);
    }
}
