//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Manual mocks instead of a mocking framework: the ports are small, and
//! tests need fine control over *when* a fetch completes, not just what it
//! returns.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
