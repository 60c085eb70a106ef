//! Domain layer
//!
//! Contains the feed's data model and the ports it consumes.
//! - `entities`: Microposts and the users who wrote them
//! - `ports`: Trait definitions for external collaborators
//!   (fetching, posting, session and navigation)

pub mod entities;
pub mod ports;
