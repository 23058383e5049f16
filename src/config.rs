use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::{LogLevel, RunMode};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Application configuration, resolved once from the command line and then
/// handed to each component explicitly.
pub struct Config {
    pub token: String,
    pub destination: PathBuf,
    pub api_url: String,
    pub min_candidates: usize,
    pub cutoff_days: u32,
    pub log_level: LogLevel,
    pub mode: RunMode,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("destination", &self.destination)
            .field("api_url", &self.api_url)
            .field("min_candidates", &self.min_candidates)
            .field("cutoff_days", &self.cutoff_days)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.token.trim().is_empty() {
            anyhow::bail!("A Slack token is required (--token or SLACK_TOKEN)");
        }

        if Utc::now()
            .checked_sub_signed(TimeDelta::days(i64::from(cli.cutoff_days)))
            .is_none()
        {
            anyhow::bail!("--cutoff-days {} is out of range", cli.cutoff_days);
        }

        let destination = std::path::absolute(expand_tilde(&cli.destination))?;

        let mode = if cli.run_delete {
            RunMode::Delete
        } else {
            RunMode::DryRun
        };

        Ok(Self {
            token: cli.token,
            destination,
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            min_candidates: cli.min_candidates,
            cutoff_days: cli.cutoff_days,
            log_level: cli.log_level,
            mode,
        })
    }

    /// Upper bound (epoch seconds) of the upload window: files uploaded
    /// before this instant are candidates.
    pub fn cutoff_timestamp(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp()
            .saturating_sub(i64::from(self.cutoff_days) * SECONDS_PER_DAY)
    }

    /// Saturates at the earliest representable date.
    pub fn cutoff_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(TimeDelta::days(i64::from(self.cutoff_days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
