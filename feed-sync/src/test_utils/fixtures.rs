//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::time::Duration;

use chrono::DateTime;

use crate::domain::entities::{Micropost, MicropostId, User, UserId, UserStats};

/// Create a test user with default values
pub fn test_user() -> User {
    User {
        id: UserId(1),
        name: "test-user".to_string(),
        email: Some("test@example.com".to_string()),
        avatar_hash: None,
        is_followed_by_me: None,
        user_stats: UserStats::default(),
    }
}

/// Create a micropost with a specific id and content
pub fn test_post(id: i64, content: &str) -> Micropost {
    Micropost {
        id: MicropostId(id),
        content: content.to_string(),
        created_at: DateTime::from_timestamp(1_488_000_000 + id * 60, 0)
            .expect("fixture timestamp in range"),
        user: test_user(),
    }
}

/// Create microposts with the given ids, in the given order
pub fn test_posts(ids: &[i64]) -> Vec<Micropost> {
    ids.iter()
        .map(|&id| test_post(id, &format!("post {}", id)))
        .collect()
}

/// Raw ids of a sequence of microposts
pub fn ids_of(posts: &[Micropost]) -> Vec<i64> {
    posts.iter().map(|post| post.id.0).collect()
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn eventually<F>(condition: F)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 2s"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
