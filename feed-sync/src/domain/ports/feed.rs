//! Feed port traits
//!
//! The two paginated sources the sync engine reads from, plus the write
//! side used when the user posts. Cursors are exclusive boundaries.

use async_trait::async_trait;

use crate::domain::entities::{Micropost, MicropostId};
use crate::error::FetchError;

/// Paginated source of timeline items
///
/// Both operations return their batch ordered newest-first.
#[async_trait]
pub trait FeedPort: Send + Sync {
    /// Items newer than `cursor`, or the latest page when `cursor` is `None`
    async fn fetch_newer(&self, cursor: Option<MicropostId>) -> Result<Vec<Micropost>, FetchError>;

    /// Items older than `cursor`, or the latest page when `cursor` is `None`
    async fn fetch_older(&self, cursor: Option<MicropostId>) -> Result<Vec<Micropost>, FetchError>;
}

/// Creates new microposts on behalf of the signed-in user
#[async_trait]
pub trait MicropostPort: Send + Sync {
    async fn create(&self, content: &str) -> Result<Micropost, FetchError>;
}
