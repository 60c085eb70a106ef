//! Cursor tracking
//!
//! Boundary cursors are derived from the ordered snapshot whenever a fetch is
//! dispatched. Nothing is cached, so a cursor can never drift from the items
//! it describes.

use crate::domain::entities::{Micropost, MicropostId};

/// Id of the newest item, the boundary for "fetch newer"
pub fn head_cursor(items: &[Micropost]) -> Option<MicropostId> {
    items.first().map(|post| post.id)
}

/// Id of the oldest item, the boundary for "fetch older"
pub fn tail_cursor(items: &[Micropost]) -> Option<MicropostId> {
    items.last().map(|post| post.id)
}
