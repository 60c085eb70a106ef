//! Token-backed session
//!
//! Holds the API bearer token in memory. The token is a JWT whose `sub`
//! claim carries the signed-in user's id.

use std::sync::RwLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::entities::UserId;
use crate::domain::ports::SessionPort;

#[derive(Debug, Default)]
pub struct TokenSession {
    token: RwLock<Option<String>>,
}

#[derive(Deserialize)]
struct Claims {
    sub: serde_json::Value,
}

impl TokenSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    pub fn set_token(&self, token: String) {
        if let Ok(mut current) = self.token.write() {
            *current = Some(token);
        }
    }

    /// User id carried in the token's `sub` claim
    pub fn subject(&self) -> Option<UserId> {
        let token = self.token()?;
        let payload = token.split('.').nth(1)?;

        let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Malformed token payload: {}", e);
                return None;
            }
        };
        let claims: Claims = match serde_json::from_slice(&bytes) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Unreadable token claims: {}", e);
                return None;
            }
        };

        match claims.sub {
            serde_json::Value::Number(n) => n.as_i64().map(UserId),
            serde_json::Value::String(s) => s.parse().ok().map(UserId),
            _ => None,
        }
    }
}

impl SessionPort for TokenSession {
    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn is_myself(&self, user: UserId) -> bool {
        self.subject() == Some(user)
    }

    fn logout(&self) {
        if let Ok(mut token) = self.token.write() {
            if token.take().is_some() {
                info!("Session cleared");
            }
        }
    }
}
