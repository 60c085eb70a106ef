//! Synchronization engine
//!
//! The feed's state machine. Composes the store, the cursor tracker and the
//! trigger router: triggers produce `FetchTicket`s for the runtime to execute,
//! and completions or failures are fed back with the same ticket. The engine
//! itself performs no I/O and never blocks.

use tracing::{debug, warn};

use crate::app::feed_store::{FeedSnapshot, FeedStore};
use crate::app::trigger_router::{Direction, FetchState, FetchTicket, Trigger, TriggerRouter};
use crate::config::{EngineConfig, RefreshCursor, ResyncMode};
use crate::domain::entities::{Micropost, MicropostId};
use crate::error::FetchError;

/// Busy/idle flag per fetch direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub newer: FetchState,
    pub older: FetchState,
}

impl SyncStatus {
    pub fn is_busy(&self) -> bool {
        self.newer == FetchState::InFlight || self.older == FetchState::InFlight
    }
}

/// Everything a renderer needs to draw the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedView {
    pub items: FeedSnapshot,
    pub status: SyncStatus,
    pub tail_exhausted: bool,
}

pub struct SyncEngine {
    store: FeedStore,
    router: TriggerRouter,
    config: EngineConfig,
}

impl SyncEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: FeedStore::new(),
            router: TriggerRouter::new(),
            config,
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.store.snapshot()
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            newer: self.router.state(Direction::Newer),
            older: self.router.state(Direction::Older),
        }
    }

    pub fn tail_exhausted(&self) -> bool {
        self.store.tail_exhausted()
    }

    pub fn view(&self) -> FeedView {
        FeedView {
            items: self.snapshot(),
            status: self.status(),
            tail_exhausted: self.tail_exhausted(),
        }
    }

    /// Route an external trigger. Returns the fetch to execute, if any.
    pub fn handle(&mut self, trigger: Trigger) -> Option<FetchTicket> {
        match trigger {
            Trigger::Start => self.start(),
            Trigger::Refresh => self.refresh(),
            Trigger::ScrolledToBottom => self.scrolled_to_bottom(),
            Trigger::ItemCreated => Some(self.item_created()),
        }
    }

    /// Initial load. Only valid on an empty, idle feed.
    pub fn start(&mut self) -> Option<FetchTicket> {
        if !self.store.is_empty() || !self.router.is_idle() {
            debug!("start ignored: feed already started");
            return None;
        }

        self.store.reset();
        let ticket = self
            .router
            .admit(Direction::Newer, None, self.store.generation());
        log_dispatch(Trigger::Start, ticket.as_ref());
        ticket
    }

    /// Pull-to-refresh. Ignored while a newer fetch is in flight.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        if self.router.state(Direction::Newer) == FetchState::InFlight {
            debug!("refresh ignored: newer fetch in flight");
            return None;
        }

        self.prepare_resync();
        let ticket = self.router.admit(
            Direction::Newer,
            self.resync_cursor(),
            self.store.generation(),
        );
        log_dispatch(Trigger::Refresh, ticket.as_ref());
        ticket
    }

    /// Page the tail. Ignored on an empty or exhausted feed, or while an
    /// older fetch is in flight.
    pub fn scrolled_to_bottom(&mut self) -> Option<FetchTicket> {
        if self.store.is_empty() {
            debug!("scroll ignored: feed is empty");
            return None;
        }
        if self.store.tail_exhausted() {
            debug!("scroll ignored: tail exhausted");
            return None;
        }

        let ticket = self.router.admit(
            Direction::Older,
            self.store.tail_cursor(),
            self.store.generation(),
        );
        if ticket.is_none() {
            debug!("scroll ignored: older fetch in flight");
        }
        log_dispatch(Trigger::ScrolledToBottom, ticket.as_ref());
        ticket
    }

    /// A post was created. Always resyncs the head, superseding any newer
    /// fetch still in flight.
    pub fn item_created(&mut self) -> FetchTicket {
        self.prepare_resync();
        let ticket = self.router.force(
            Direction::Newer,
            self.resync_cursor(),
            self.store.generation(),
        );
        log_dispatch(Trigger::ItemCreated, Some(&ticket));
        ticket
    }

    /// Apply a successful fetch. Returns whether the view changed.
    pub fn complete(&mut self, ticket: &FetchTicket, batch: Vec<Micropost>) -> bool {
        let settled = self.router.settle(ticket);
        let count = batch.len();

        let changed = match ticket.direction {
            Direction::Newer => self.store.merge_newer(batch),
            Direction::Older if batch.is_empty() && !self.is_current_generation(ticket) => {
                debug!(ticket = %ticket.id, "empty older page predates reset, tail left open");
                false
            }
            Direction::Older => self.store.merge_older(batch),
        };

        debug!(
            direction = %ticket.direction,
            ticket = %ticket.id,
            count,
            settled,
            changed,
            total = self.store.len(),
            "fetch completed"
        );
        settled || changed
    }

    /// Record a failed fetch. The snapshot is left untouched. Returns whether
    /// the view changed.
    pub fn fail(&mut self, ticket: &FetchTicket, error: &FetchError) -> bool {
        let settled = self.router.settle(ticket);
        warn!(
            direction = %ticket.direction,
            ticket = %ticket.id,
            cursor = ?ticket.cursor.map(|c| c.0),
            settled,
            "fetch failed: {}",
            error
        );
        settled
    }

    fn prepare_resync(&mut self) {
        match self.config.resync_mode {
            ResyncMode::Merge => {
                self.store.clear_exhaustion();
            }
            ResyncMode::Replace => self.store.reset(),
        }
    }

    fn resync_cursor(&self) -> Option<MicropostId> {
        match self.config.refresh_cursor {
            RefreshCursor::Absent => None,
            RefreshCursor::Head => self.store.head_cursor(),
        }
    }

    fn is_current_generation(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.store.generation()
    }
}

fn log_dispatch(trigger: Trigger, ticket: Option<&FetchTicket>) {
    if let Some(ticket) = ticket {
        debug!(
            %trigger,
            direction = %ticket.direction,
            ticket = %ticket.id,
            cursor = ?ticket.cursor.map(|c| c.0),
            "fetch dispatched"
        );
    }
}
