//! Micropost domain entity
//!
//! A micropost is one timeline item. Its id is unique and totally ordered:
//! a higher id was created later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Unique identifier for a micropost, also used as a pagination cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MicropostId(pub i64);

impl From<i64> for MicropostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MicropostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Micropost {
    pub id: MicropostId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": 42,
            "content": "hello world",
            "createdAt": "2017-03-01T12:00:00Z",
            "user": {
                "id": 7,
                "name": "akira",
                "email": "akira@example.com",
                "avatarHash": "d41d8cd98f00b204e9800998ecf8427e",
                "isFollowedByMe": false,
                "userStats": {"micropostCnt": 3, "followingCnt": 1, "followerCnt": 2}
            }
        }"#;

        let post: Micropost = serde_json::from_str(json).unwrap();

        assert_eq!(post.id, MicropostId(42));
        assert_eq!(post.content, "hello world");
        assert_eq!(post.user.name, "akira");
        assert_eq!(post.user.user_stats.micropost_cnt, 3);
    }

    #[test]
    fn ids_order_by_creation() {
        assert!(MicropostId(2) > MicropostId(1));
        assert_eq!(MicropostId::from(5).to_string(), "5");
    }
}
