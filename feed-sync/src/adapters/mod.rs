//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod micropost_api;
pub mod session;

pub use micropost_api::MicropostApiClient;
pub use session::TokenSession;
