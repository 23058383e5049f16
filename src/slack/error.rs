use thiserror::Error;

/// A single failed Web API exchange.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error calling {method}: {source}")]
    Http {
        method: String,
        source: reqwest::Error,
    },
    #[error("HTTP status {status} calling {method}")]
    HttpStatus { method: String, status: u16 },
    #[error("Invalid JSON from {method}: {source}")]
    Json {
        method: String,
        source: serde_json::Error,
    },
    #[error("Slack rejected {method}: {reason}")]
    Api { method: String, reason: String },
}

/// Failures of the listing phase. Both are fatal to the run.
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Failed to fetch {directory} directory")]
    DirectoryFetch {
        directory: &'static str,
        #[source]
        source: ApiError,
    },
    #[error("Failed to fetch file listing page {page}")]
    PageFetch {
        page: u32,
        #[source]
        source: ApiError,
    },
}
