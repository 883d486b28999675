//! NPS Explorer - Browse US national park sites and places nearby
//!
//! An interactive prompt that lists the park service sites in a state and
//! searches MapQuest for places around a chosen site.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nps_explorer::cache::DiskCache;
use nps_explorer::cli::{Cli, StartupConfig};
use nps_explorer::data::{NpsClient, PlacesClient};
use nps_explorer::explorer::Explorer;
use nps_explorer::session::Session;

/// Sends log output to stderr so it never mixes with the prompts on stdout
fn init_logging(config: &StartupConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config);

    let index_cache = DiskCache::load(&config.cache_file);
    info!(
        path = %config.cache_file.display(),
        entries = index_cache.len(),
        "Loaded state index cache"
    );

    let nps = NpsClient::with_base_url(&config.base_url);
    let index_key = nps.base_url().to_string();
    let places = PlacesClient::new(config.api_key);
    let explorer = Explorer::new(nps, places, index_key, index_cache);

    let mut session = Session::new(explorer, io::stdin().lock(), io::stdout());
    match session.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Session aborted");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
