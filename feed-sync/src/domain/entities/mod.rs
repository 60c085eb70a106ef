//! Domain entities
//!
//! Immutable values as returned by the micropost API.

pub mod micropost;
pub mod user;

pub use micropost::{Micropost, MicropostId};
pub use user::{User, UserId, UserStats};
