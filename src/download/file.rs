use std::path::Path;

use futures_util::StreamExt;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::error::DownloadError;
use super::paths::part_path;
use crate::slack::SlackApi;

/// Stream a private file to `download_path`.
///
/// The body is written to a `.part` sibling which is flushed, closed and
/// then renamed into place, so the returned future only resolves once the
/// file is complete on disk. Returns the number of bytes written.
pub async fn download_file(
    api: &dyn SlackApi,
    url: &str,
    download_path: &Path,
) -> Result<u64, DownloadError> {
    let part_path = part_path(download_path);
    let result = attempt_download(api, url, download_path, &part_path).await;
    if result.is_err() {
        let _ = fs::remove_file(&part_path).await;
    }
    result
}

async fn attempt_download(
    api: &dyn SlackApi,
    url: &str,
    download_path: &Path,
    part_path: &Path,
) -> Result<u64, DownloadError> {
    let path_str = download_path.display().to_string();
    let response = api.fetch(url).await.map_err(|e| DownloadError::Http {
        source: e,
        path: path_str.clone(),
        bytes_written: 0,
    })?;

    if !response.status().is_success() {
        return Err(DownloadError::HttpStatus {
            status: response.status().as_u16(),
            path: path_str,
        });
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(part_path)
        .await?;

    let mut bytes_written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::Http {
            source: e,
            path: path_str.clone(),
            bytes_written,
        })?;
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(part_path, download_path).await?;

    Ok(bytes_written)
}
