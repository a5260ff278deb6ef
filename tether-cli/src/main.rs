//! Tether CLI
//!
//! Bootstraps CI/CD workflows from a git repository against a workflow
//! control plane.

mod commands;
mod config;
mod git;
mod init;
mod prompt;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "tether=warn,tether_cli=warn,tether_client=warn";
const VERBOSE_LOG_FILTER: &str = "tether=debug,tether_cli=debug,tether_client=debug";

#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Workflow-as-code bootstrap CLI", long_about = None)]
struct Cli {
    /// Control plane API URL
    #[arg(
        long,
        global = true,
        env = "TETHER_API_URL",
        default_value = "http://localhost:8081"
    )]
    api_url: String,

    /// Session token sent as a bearer token
    #[arg(long, global = true, env = "TETHER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Delay before the first operation status re-query, in milliseconds
    #[arg(long, global = true, env = "TETHER_POLL_INTERVAL_MS", default_value = "500")]
    poll_interval_ms: u64,

    /// Maximum time to wait for a remote operation, in seconds
    #[arg(long, global = true, env = "TETHER_POLL_TIMEOUT_SECS", default_value = "300")]
    poll_timeout_secs: u64,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_url: cli.api_url,
        token: cli.token,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        poll_timeout: Duration::from_secs(cli.poll_timeout_secs),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
