//! Feed store
//!
//! Owns the single ordered sequence of microposts (newest first, unique ids)
//! and the tail exhaustion flag. Snapshots handed out are shared,
//! copy-on-write views: mutating the store never alters a snapshot a
//! consumer already holds.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use crate::app::cursor::{head_cursor, tail_cursor};
use crate::domain::entities::{Micropost, MicropostId};

/// Immutable, cheaply clonable view of the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot(Arc<Vec<Micropost>>);

impl FeedSnapshot {
    pub fn ids(&self) -> Vec<MicropostId> {
        self.0.iter().map(|post| post.id).collect()
    }

    pub fn head_cursor(&self) -> Option<MicropostId> {
        head_cursor(&self.0)
    }

    pub fn tail_cursor(&self) -> Option<MicropostId> {
        tail_cursor(&self.0)
    }
}

impl Deref for FeedSnapshot {
    type Target = [Micropost];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct FeedStore {
    items: FeedSnapshot,
    tail_exhausted: bool,
    /// Bumped on every reset so callers can tell pre-reset results apart
    generation: u64,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.items.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn tail_exhausted(&self) -> bool {
        self.tail_exhausted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn head_cursor(&self) -> Option<MicropostId> {
        self.items.head_cursor()
    }

    pub fn tail_cursor(&self) -> Option<MicropostId> {
        self.items.tail_cursor()
    }

    /// Merge a batch of items newer than the current head.
    ///
    /// The batch must be ordered newest-first; that is the caller's
    /// responsibility and is not checked. Items already held are dropped, so
    /// merging the same batch twice is a no-op. Returns whether the snapshot
    /// changed.
    pub fn merge_newer(&mut self, batch: Vec<Micropost>) -> bool {
        self.splice(batch)
    }

    /// Merge a batch of items older than the current tail.
    ///
    /// Same ordering precondition and de-duplication as `merge_newer`. An
    /// empty batch marks the tail exhausted. Returns whether the snapshot or
    /// the exhaustion flag changed.
    pub fn merge_older(&mut self, batch: Vec<Micropost>) -> bool {
        if batch.is_empty() {
            let changed = !self.tail_exhausted;
            self.tail_exhausted = true;
            return changed;
        }
        self.splice(batch)
    }

    /// Drop all items and pagination progress
    pub fn reset(&mut self) {
        self.items = FeedSnapshot::default();
        self.tail_exhausted = false;
        self.generation += 1;
    }

    /// Allow the tail to be paged again without dropping items
    pub fn clear_exhaustion(&mut self) -> bool {
        std::mem::replace(&mut self.tail_exhausted, false)
    }

    fn splice(&mut self, batch: Vec<Micropost>) -> bool {
        let fresh = self.unseen(batch);
        if fresh.is_empty() {
            return false;
        }

        let items = Arc::make_mut(&mut self.items.0);
        let current = std::mem::take(items);
        *items = merge_descending(fresh, current);
        true
    }

    /// Items of `batch` not already held, first occurrence wins within the batch
    fn unseen(&self, batch: Vec<Micropost>) -> Vec<Micropost> {
        let mut seen: HashSet<MicropostId> = self.items.iter().map(|post| post.id).collect();
        batch
            .into_iter()
            .filter(|post| seen.insert(post.id))
            .collect()
    }
}

/// Merge two newest-first sequences into one.
///
/// When every id in `fresh` is above the head of `current` this is a plain
/// prepend; when every id is below the tail it is a plain append.
fn merge_descending(fresh: Vec<Micropost>, current: Vec<Micropost>) -> Vec<Micropost> {
    let mut merged = Vec::with_capacity(fresh.len() + current.len());
    let mut fresh = fresh.into_iter().peekable();
    let mut current = current.into_iter().peekable();

    loop {
        let take_fresh = match (fresh.peek(), current.peek()) {
            (Some(a), Some(b)) => a.id > b.id,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_fresh {
            fresh.next()
        } else {
            current.next()
        };
        merged.extend(next);
    }

    merged
}
