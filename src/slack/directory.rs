//! User and channel directories: id → display name lookups used to label
//! downloaded files.

use std::collections::HashMap;

use serde::Deserialize;

use super::error::SlackError;
use super::session::{decode, SlackApi};

/// Maximum entries requested per directory call.
const DIRECTORY_LIMIT: u32 = 500;

pub type UserDirectory = HashMap<String, String>;
pub type ChannelDirectory = HashMap<String, String>;

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UsersList {
    members: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct ChannelsList {
    channels: Vec<DirectoryEntry>,
}

fn into_directory(entries: Vec<DirectoryEntry>) -> HashMap<String, String> {
    entries.into_iter().map(|e| (e.id, e.name)).collect()
}

/// Fetch the workspace's members via `users.list`.
pub async fn resolve_users(api: &dyn SlackApi) -> Result<UserDirectory, SlackError> {
    const METHOD: &str = "users.list";
    let fail = |source| SlackError::DirectoryFetch {
        directory: "user",
        source,
    };

    let json = api
        .call(METHOD, &[("count", DIRECTORY_LIMIT.to_string())])
        .await
        .map_err(fail)?;
    let list: UsersList = decode(METHOD, json).map_err(fail)?;

    tracing::debug!(count = list.members.len(), "Resolved user directory");
    Ok(into_directory(list.members))
}

/// Fetch the workspace's channels via `channels.list`.
pub async fn resolve_channels(api: &dyn SlackApi) -> Result<ChannelDirectory, SlackError> {
    const METHOD: &str = "channels.list";
    let fail = |source| SlackError::DirectoryFetch {
        directory: "channel",
        source,
    };

    let json = api
        .call(
            METHOD,
            &[
                ("exclude_members", "true".to_string()),
                ("count", DIRECTORY_LIMIT.to_string()),
            ],
        )
        .await
        .map_err(fail)?;
    let list: ChannelsList = decode(METHOD, json).map_err(fail)?;

    tracing::debug!(count = list.channels.len(), "Resolved channel directory");
    Ok(into_directory(list.channels))
}
