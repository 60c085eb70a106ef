//! Session and navigation ports

use crate::domain::entities::UserId;

/// Authentication state of the current user
pub trait SessionPort: Send + Sync {
    /// Whether a signed-in session exists; gates the feed engine
    fn is_authenticated(&self) -> bool;

    /// Whether `user` is the signed-in user
    fn is_myself(&self, user: UserId) -> bool;

    /// Forget the current session
    fn logout(&self);
}

/// Screen transitions owned by the front end
pub trait Navigator: Send + Sync {
    /// Leave the feed for the signed-out landing screen
    fn navigate_to_top(&self);
}
