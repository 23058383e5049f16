use clap::Parser;

use crate::types::LogLevel;

/// Largest accepted `--cutoff-days` (about 2700 years).
pub const MAX_CUTOFF_DAYS: u32 = 1_000_000;

#[derive(Parser, Debug)]
#[command(
    name = "slack-reaper",
    about = "Download old Slack files by channel and optionally delete them"
)]
pub struct Cli {
    /// Slack API token for authentication.
    /// Prefer the SLACK_TOKEN environment variable over passing it on the
    /// command line, where it is visible in process listings.
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Perform a dry run (the default unless --run-delete is given)
    #[arg(long, conflicts_with = "run_delete")]
    pub dry_run: bool,

    /// Download and delete files from Slack
    #[arg(long)]
    pub run_delete: bool,

    /// Download file destination
    #[arg(long, visible_alias = "dest", default_value = ".")]
    pub destination: String,

    /// Number of days to preserve files for
    #[arg(
        long,
        default_value_t = 120,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_CUTOFF_DAYS))
    )]
    pub cutoff_days: u32,

    /// Stop paging once at least this many candidates have been gathered
    #[arg(long, default_value_t = 50)]
    pub min_candidates: usize,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Base URL of the Slack Web API
    #[arg(long, env = "SLACK_API_URL", default_value = "https://slack.com/api", hide = true)]
    pub api_url: String,
}
