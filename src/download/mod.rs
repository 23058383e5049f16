//! Download processor: drains the candidate list one file at a time,
//! downloading each into its channel folder and then deleting it from Slack.
//! The first failure stops the batch; the caller decides how to report it.

pub mod error;
pub mod file;
pub mod paths;

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, error, info, warn};

use self::error::DownloadError;
use crate::slack::{FileDescriptor, SlackApi};
use crate::types::RunMode;

/// Subset of application config consumed by the processor.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub(crate) destination: PathBuf,
    pub(crate) mode: RunMode,
}

/// How a processing pass ended.
#[derive(Debug)]
pub enum ProcessOutcome {
    Completed {
        processed: usize,
    },
    /// `error` hit the file after the `processed` successful ones;
    /// `remaining` files were never attempted.
    Aborted {
        processed: usize,
        remaining: usize,
        error: DownloadError,
    },
}

impl ProcessOutcome {
    pub fn log_summary(&self) {
        match self {
            ProcessOutcome::Completed { processed } => {
                info!(processed, "Processed all candidates");
            }
            ProcessOutcome::Aborted {
                processed,
                remaining,
                error: err,
            } => {
                error!(
                    processed,
                    remaining, "Processing stopped, remaining files left untouched: {}", err
                );
                if err.is_delete_failure() {
                    warn!("The last file was downloaded but is still present in Slack");
                }
            }
        }
    }
}

/// Process candidates last-to-first, strictly one at a time.
///
/// Never returns an error: a failure ends the pass and is carried in
/// [`ProcessOutcome::Aborted`].
pub async fn process_all(
    api: &dyn SlackApi,
    mut candidates: Vec<FileDescriptor>,
    config: &ProcessConfig,
) -> ProcessOutcome {
    let mut processed = 0;

    while let Some(candidate) = candidates.pop() {
        if let Err(error) = process_one(api, &candidate, config).await {
            return ProcessOutcome::Aborted {
                processed,
                remaining: candidates.len(),
                error,
            };
        }
        processed += 1;
    }

    ProcessOutcome::Completed { processed }
}

async fn process_one(
    api: &dyn SlackApi,
    candidate: &FileDescriptor,
    config: &ProcessConfig,
) -> Result<(), DownloadError> {
    info!("Downloading `{}` from `{}`", candidate.filename, candidate.folder);
    if config.mode.is_dry_run() {
        return Ok(());
    }

    fs::create_dir_all(paths::folder_path(&config.destination, &candidate.folder)).await?;
    let download_path =
        paths::local_download_path(&config.destination, &candidate.folder, &candidate.filename);

    let bytes = file::download_file(api, &candidate.permalink, &download_path).await?;
    info!(bytes, "Download complete: {}", download_path.display());

    api.call("files.delete", &[("file", candidate.id.clone())])
        .await
        .map_err(|source| DownloadError::Delete {
            id: candidate.id.clone(),
            source,
        })?;
    debug!(id = %candidate.id, "Deleted from Slack");

    Ok(())
}
