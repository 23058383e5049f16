//! Slack Web API access: directories, file listings and the client they
//! share.

pub mod directory;
pub mod error;
pub mod files;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use directory::{resolve_channels, resolve_users};
pub use error::{ApiError, SlackError};
pub use files::{collect_candidates, FileDescriptor, FilesQuery};
pub use session::{SlackApi, SlackClient};
