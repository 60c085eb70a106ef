//! Micropost API adapter
//!
//! HTTP implementation of the feed and micropost ports.

pub mod client;

pub use client::MicropostApiClient;
