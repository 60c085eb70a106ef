//! Fetch error handling
//!
//! Turns a `FetchError` into the message shown to the user. An expired or
//! rejected token also ends the session.

use std::sync::Arc;

use tracing::error;

use crate::domain::ports::SessionPort;
use crate::error::FetchError;

pub const TIMED_OUT: &str = "Connection timed out.";
pub const CANNOT_CONNECT: &str = "Cannot connect to server.";
pub const SIGN_IN: &str = "Please sign in.";
pub const SOMETHING_BAD: &str = "Something bad happened.";

pub struct FetchErrorHandler<S>
where
    S: SessionPort + ?Sized,
{
    session: Arc<S>,
}

impl<S> FetchErrorHandler<S>
where
    S: SessionPort + ?Sized,
{
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    /// Message for the user, or `None` when the failure needs no notice
    pub fn handle(&self, failure: &FetchError) -> Option<&'static str> {
        match failure {
            FetchError::Timeout => Some(TIMED_OUT),
            FetchError::Connect(_) => Some(CANNOT_CONNECT),
            FetchError::Unauthorized | FetchError::Http { status: 401, .. } => {
                self.session.logout();
                Some(SIGN_IN)
            }
            FetchError::Http { status, .. } if *status >= 500 => Some(SOMETHING_BAD),
            FetchError::Http { .. } => None,
            FetchError::Deserialization(_) | FetchError::Request(_) => {
                error!("Unexpected fetch failure: {}", failure);
                Some(SOMETHING_BAD)
            }
        }
    }
}
