//! Trigger routing and per-direction admission control
//!
//! Each fetch direction has at most one *current* request. A guarded dispatch
//! is refused while the direction is busy; a forced dispatch supersedes the
//! current request instead. Superseded requests still complete, but only the
//! current request's completion returns the direction to idle.

use crate::domain::entities::MicropostId;

/// External signals the feed reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Initial load after the session gate passed
    Start,
    /// Pull-to-refresh
    Refresh,
    /// The list was scrolled to its last item
    ScrolledToBottom,
    /// The user posted a new micropost
    ItemCreated,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Start => write!(f, "start"),
            Trigger::Refresh => write!(f, "refresh"),
            Trigger::ScrolledToBottom => write!(f, "scrolled_to_bottom"),
            Trigger::ItemCreated => write!(f, "item_created"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Newer,
    Older,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Newer => write!(f, "newer"),
            Direction::Older => write!(f, "older"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketId(pub u64);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One dispatched fetch. The cursor is captured when the ticket is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: TicketId,
    pub direction: Direction,
    pub cursor: Option<MicropostId>,
    /// Store generation at dispatch time
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct TriggerRouter {
    newer: Option<TicketId>,
    older: Option<TicketId>,
    issued: u64,
}

impl TriggerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, direction: Direction) -> FetchState {
        match self.slot(direction) {
            Some(_) => FetchState::InFlight,
            None => FetchState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.newer.is_none() && self.older.is_none()
    }

    /// Issue a ticket unless the direction already has one in flight
    pub fn admit(
        &mut self,
        direction: Direction,
        cursor: Option<MicropostId>,
        generation: u64,
    ) -> Option<FetchTicket> {
        if self.slot(direction).is_some() {
            return None;
        }
        Some(self.force(direction, cursor, generation))
    }

    /// Issue a ticket, superseding any request in flight for the direction
    pub fn force(
        &mut self,
        direction: Direction,
        cursor: Option<MicropostId>,
        generation: u64,
    ) -> FetchTicket {
        self.issued += 1;
        let id = TicketId(self.issued);
        *self.slot_mut(direction) = Some(id);

        FetchTicket {
            id,
            direction,
            cursor,
            generation,
        }
    }

    /// Record a finished fetch. Returns `true` if it was the current request
    /// for its direction, which is now idle; `false` for superseded tickets.
    pub fn settle(&mut self, ticket: &FetchTicket) -> bool {
        let slot = self.slot_mut(ticket.direction);
        if *slot == Some(ticket.id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn slot(&self, direction: Direction) -> &Option<TicketId> {
        match direction {
            Direction::Newer => &self.newer,
            Direction::Older => &self.older,
        }
    }

    fn slot_mut(&mut self, direction: Direction) -> &mut Option<TicketId> {
        match direction {
            Direction::Newer => &mut self.newer,
            Direction::Older => &mut self.older,
        }
    }
}
