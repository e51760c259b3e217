pub mod analytics;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod models;
pub mod phase;
pub mod progression;
pub mod roadmap;
pub mod routine;
pub mod store;

#[cfg(test)]
mod test_utils;

use clap::Parser;
use std::io;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::AppState;
use config::AppConfig;

/// Entry point for the `power-sculpt` binary. Returns the process exit code.
pub async fn run() -> i32 {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = match AppConfig::from_env() {
    Ok(config) => cli.apply_overrides(config),
    Err(e) => {
      error!("Invalid configuration: {}", e);
      return 2;
    }
  };

  let state = match AppState::initialize(config).await {
    Ok(state) => state,
    Err(e) => {
      error!("{}", e);
      return 1;
    }
  };

  let mut stdout = io::stdout().lock();
  match cli::execute(&state, cli.today(), &cli.command, &mut stdout).await {
    Ok(()) => 0,
    Err(e) => {
      eprintln!("{}", e);
      1
    }
  }
}

/// Log to stderr so command output on stdout stays clean.
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}
