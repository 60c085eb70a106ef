//! Application layer
//!
//! The feed sync engine and the services around it.
//! - `cursor`, `feed_store`, `trigger_router`, `sync_engine`: the pure
//!   state machine, no I/O
//! - `feed_sync_service`: async runtime owning one engine
//! - `error_handler`, `micropost_service`: user-facing use cases

pub mod cursor;
pub mod error_handler;
pub mod feed_store;
pub mod feed_sync_service;
pub mod micropost_service;
pub mod sync_engine;
pub mod trigger_router;

pub use cursor::{head_cursor, tail_cursor};
pub use error_handler::FetchErrorHandler;
pub use feed_store::{FeedSnapshot, FeedStore};
pub use feed_sync_service::{FeedHandle, FeedSyncService, FetchFailure};
pub use micropost_service::{MicropostService, MAX_CONTENT_LENGTH};
pub use sync_engine::{FeedView, SyncEngine, SyncStatus};
pub use trigger_router::{Direction, FetchState, FetchTicket, TicketId, Trigger, TriggerRouter};
