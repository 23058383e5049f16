//! Candidate discovery: paged `files.list` requests turned into
//! [`FileDescriptor`]s ready for the download processor.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::directory::{ChannelDirectory, UserDirectory};
use super::error::{ApiError, SlackError};
use super::session::{decode, SlackApi};
use crate::download::paths::sanitize_segment;

/// Files requested per listing page.
pub const PAGE_SIZE: u32 = 50;

/// A file as reported by `files.list`. Only the fields used here are decoded.
#[derive(Debug, Deserialize)]
pub struct RawFileEntry {
    pub id: String,
    pub timestamp: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    pages: u32,
}

/// One page of `files.list`. Entries stay as raw JSON so that a single
/// malformed file does not fail the whole page; a page without `paging` is
/// rejected.
#[derive(Debug, Deserialize)]
struct FilesPage {
    paging: Paging,
    #[serde(default)]
    files: Vec<Value>,
}

/// Normalized unit of work for the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// `<timestamp> - <uploader> - <name>`, safe as a single path segment.
    pub filename: String,
    /// Display name of the first channel the file was shared to.
    pub folder: String,
    pub permalink: String,
    pub id: String,
}

/// Listing filter shared by every page request.
#[derive(Debug, Clone, Copy)]
pub struct FilesQuery {
    /// Upper bound of the upload window, epoch seconds.
    pub ts_to: i64,
}

impl FilesQuery {
    fn params(&self, page: u32) -> [(&'static str, String); 4] {
        [
            ("ts_from", "0".to_string()),
            ("ts_to", self.ts_to.to_string()),
            ("count", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ]
    }
}

/// `2019-04-01T12_30_05 - alice - report.pdf`
fn derive_filename(entry: &RawFileEntry, users: &UserDirectory) -> Option<String> {
    let uploaded = DateTime::from_timestamp(entry.timestamp, 0)?;
    let uploader = users.get(&entry.user).unwrap_or(&entry.user);
    Some(sanitize_segment(&format!(
        "{} - {} - {}",
        uploaded.format("%Y-%m-%dT%H:%M:%S"),
        uploader,
        entry.name
    )))
}

fn build_descriptor(
    entry: RawFileEntry,
    query: &FilesQuery,
    users: &UserDirectory,
    channels: &ChannelDirectory,
) -> Option<FileDescriptor> {
    if entry.timestamp > query.ts_to {
        return None;
    }
    let channel = entry.channels.first()?;
    let permalink = entry
        .url_private_download
        .as_deref()
        .filter(|url| !url.is_empty())?;
    let filename = derive_filename(&entry, users)?;
    let folder = channels.get(channel).unwrap_or(channel);

    Some(FileDescriptor {
        filename,
        folder: folder.clone(),
        permalink: permalink.to_string(),
        id: entry.id,
    })
}

/// Turn one page of raw listing entries into descriptors, preserving order.
///
/// Entries without a channel, without a download link, newer than the
/// query's cutoff, or that fail to decode are dropped.
pub fn build_descriptors(
    files: Vec<Value>,
    query: &FilesQuery,
    users: &UserDirectory,
    channels: &ChannelDirectory,
) -> Vec<FileDescriptor> {
    files
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<RawFileEntry>(raw) {
            Ok(entry) => {
                let id = entry.id.clone();
                let descriptor = build_descriptor(entry, query, users, channels);
                if descriptor.is_none() {
                    debug!(id = %id, "Skipping file outside the window or without channel/link");
                }
                descriptor
            }
            Err(e) => {
                debug!("Skipping undecodable file entry: {}", e);
                None
            }
        })
        .collect()
}

async fn fetch_page(
    api: &dyn SlackApi,
    query: &FilesQuery,
    page: u32,
) -> Result<FilesPage, ApiError> {
    const METHOD: &str = "files.list";
    let json = api.call(METHOD, &query.params(page)).await?;
    decode(METHOD, json)
}

/// Request listing pages in order until at least `min_count` candidates are
/// gathered or the page count reported by the first response is reached.
///
/// `min_count` is a floor: the last page fetched is kept whole, so the result
/// may exceed it.
pub async fn collect_candidates(
    api: &dyn SlackApi,
    query: &FilesQuery,
    users: &UserDirectory,
    channels: &ChannelDirectory,
    min_count: usize,
) -> Result<Vec<FileDescriptor>, SlackError> {
    let mut candidates: Vec<FileDescriptor> = Vec::new();
    let mut total_pages: Option<u32> = None;
    let mut page: u32 = 1;

    loop {
        info!(
            "Fetching page {} with {} candidates so far",
            page,
            candidates.len()
        );
        let listing = fetch_page(api, query, page)
            .await
            .map_err(|source| SlackError::PageFetch { page, source })?;

        let bound = *total_pages.get_or_insert(listing.paging.pages);
        candidates.extend(build_descriptors(listing.files, query, users, channels));

        if candidates.len() >= min_count || page >= bound {
            break;
        }
        page += 1;
    }

    debug!(
        pages = page,
        candidates = candidates.len(),
        "Finished collecting candidates"
    );
    Ok(candidates)
}
