//! Command-line interface parsing for NPS Explorer
//!
//! This module handles parsing of CLI arguments using clap and resolves them
//! into the settings the application starts with.

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;

use crate::data::nps::NPS_BASE_URL;

/// File name of the persisted state index
pub const CACHE_FILE_NAME: &str = "site.json";

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// No MapQuest key was given on the command line or in the environment
    #[error("MapQuest API key required: pass --api-key or set MAPQUEST_API_KEY")]
    MissingApiKey,
}

/// NPS Explorer - Browse national park sites by state and find places nearby
#[derive(Parser, Debug)]
#[command(name = "nps-explorer")]
#[command(about = "Browse US national park sites by state and find places nearby")]
#[command(version)]
pub struct Cli {
    /// Path of the state index cache file
    ///
    /// Defaults to `site.json` in the platform cache directory
    /// (`~/.cache/nps-explorer/` on Linux).
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// MapQuest API key used for nearby place searches
    #[arg(long, value_name = "KEY", env = "MAPQUEST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Root URL of the park service website
    #[arg(long, value_name = "URL", default_value = NPS_BASE_URL)]
    pub base_url: String,

    /// Log cache hits and fetches to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Where the state index is persisted
    pub cache_file: PathBuf,
    /// MapQuest API key
    pub api_key: String,
    /// Root URL of the park service website
    pub base_url: String,
    /// Whether debug logging is enabled by default
    pub verbose: bool,
}

/// Default location of the state index cache file
///
/// Uses the XDG cache directory when one can be determined, otherwise the
/// current directory.
pub fn default_cache_file() -> PathBuf {
    ProjectDirs::from("", "", "nps-explorer")
        .map(|dirs| dirs.cache_dir().join(CACHE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CACHE_FILE_NAME))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with defaults filled in
    /// * `Err(CliError::MissingApiKey)` if no usable API key was supplied
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        Ok(StartupConfig {
            cache_file: cli.cache_file.clone().unwrap_or_else(default_cache_file),
            api_key,
            base_url: cli.base_url.clone(),
            verbose: cli.verbose,
        })
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "nps_explorer=debug"
        } else {
            "warn"
        }
    }
}
