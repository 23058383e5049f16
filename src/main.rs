//! slack-reaper: downloads Slack files older than a retention window into
//! per-channel folders and optionally deletes them from the workspace.
//!
//! Pages of `files.list` are gathered until a minimum batch is reached and
//! labelled with the user and channel directories. The batch is then processed
//! strictly one file at a time; a failed download or delete stops the batch
//! without failing the run.

#![warn(clippy::all)]

mod cli;
mod config;
mod download;
mod slack;
mod types;

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::Config;
use download::{ProcessConfig, ProcessOutcome};
use slack::{FilesQuery, SlackApi, SlackClient};

/// Resolve directories, collect candidates and process them, then write the
/// completion line to `out`.
///
/// Directory and listing failures are returned as errors and nothing is
/// written. Processing failures are contained in the returned outcome and
/// the completion line is still written.
async fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<ProcessOutcome> {
    let client = SlackClient::new(&config.api_url, &config.token);
    let api: &dyn SlackApi = &client;

    let users = slack::resolve_users(api).await?;
    let channels = slack::resolve_channels(api).await?;
    tracing::info!(
        users = users.len(),
        channels = channels.len(),
        "Resolved workspace directories"
    );

    let now = chrono::Utc::now();
    let query = FilesQuery {
        ts_to: config.cutoff_timestamp(now),
    };
    tracing::info!(
        mode = ?config.mode,
        "Collecting files uploaded before {}",
        config.cutoff_date(now).format("%Y-%m-%d %H:%M:%S UTC")
    );
    let candidates =
        slack::collect_candidates(api, &query, &users, &channels, config.min_candidates).await?;
    tracing::info!(count = candidates.len(), "Collected candidates");

    let process_config = ProcessConfig {
        destination: config.destination.clone(),
        mode: config.mode,
    };
    let outcome = download::process_all(api, candidates, &process_config).await;
    outcome.log_summary();
    writeln!(out, "DONE")?;

    Ok(outcome)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = Config::from_cli(cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter())),
        )
        .init();
    tracing::debug!(?config, "Starting slack-reaper");

    run(&config, &mut std::io::stdout()).await?;

    Ok(())
}
