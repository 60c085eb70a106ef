//! Micropost service
//!
//! Posting is a write followed by a forced resync of the feed head, so the
//! new micropost shows up at the top of the timeline.

use std::sync::Arc;

use tracing::info;

use crate::app::feed_sync_service::FeedHandle;
use crate::domain::entities::Micropost;
use crate::domain::ports::MicropostPort;
use crate::error::AppError;

/// Longest accepted micropost, in characters
pub const MAX_CONTENT_LENGTH: usize = 140;

pub struct MicropostService<M>
where
    M: MicropostPort,
{
    microposts: Arc<M>,
    feed: FeedHandle,
}

impl<M> MicropostService<M>
where
    M: MicropostPort,
{
    pub fn new(microposts: Arc<M>, feed: FeedHandle) -> Self {
        Self { microposts, feed }
    }

    /// Create a micropost, then resync the feed head
    pub async fn post(&self, content: &str) -> Result<Micropost, AppError> {
        let content = content.trim();
        validate_content(content)?;

        let created = self.microposts.create(content).await?;
        info!(id = %created.id, "Micropost created");

        self.feed.item_created()?;
        Ok(created)
    }
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.is_empty() {
        return Err(AppError::Validation("Micropost is empty".to_string()));
    }
    let length = content.chars().count();
    if length > MAX_CONTENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Micropost is {} characters, limit is {}",
            length, MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}
