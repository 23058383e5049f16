use thiserror::Error;

use crate::slack::ApiError;

/// Failures while downloading or deleting a single file. These abort the
/// remaining batch but never the run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error {status} downloading {path}")]
    HttpStatus { status: u16, path: String },

    #[error("HTTP error downloading {path} (bytes_so_far={bytes_written}): {source}")]
    Http {
        source: reqwest::Error,
        path: String,
        bytes_written: u64,
    },

    #[error("Disk error: {0}")]
    Disk(#[from] std::io::Error),

    #[error("Failed to delete file {id} from Slack: {source}")]
    Delete {
        id: String,
        #[source]
        source: ApiError,
    },
}

impl DownloadError {
    /// Whether the remote file may already be gone (the failure happened
    /// after a successful download).
    pub fn is_delete_failure(&self) -> bool {
        matches!(self, DownloadError::Delete { .. })
    }
}
