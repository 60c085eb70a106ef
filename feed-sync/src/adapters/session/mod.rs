//! Session adapter
//!
//! Bearer-token session backing the authentication gate.

pub mod token_session;

pub use token_session::TokenSession;
