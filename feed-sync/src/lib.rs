//! Micropost feed sync
//!
//! Keeps a micropost timeline in step with two paginated sources, "newer
//! than" and "older than" a cursor, driven by four triggers: start, refresh,
//! scroll to bottom and post created. Uses hexagonal (ports & adapters)
//! architecture: the engine only sees the traits in `domain::ports`.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;

pub use app::{
    Direction, FeedHandle, FeedSnapshot, FeedSyncService, FeedView, FetchErrorHandler, FetchFailure,
    FetchState, MicropostService, SyncEngine, SyncStatus, Trigger,
};
pub use config::{Config, EngineConfig, RefreshCursor, ResyncMode};
pub use error::{AppError, ConfigError, FetchError};
