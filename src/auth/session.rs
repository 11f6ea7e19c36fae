//! Session management for authentication

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

use super::types::User;

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The access token
    pub access_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// The token type
    #[serde(default = "bearer")]
    pub token_type: String,

    /// The expiry time in seconds
    pub expires_in: i64,

    /// The expiry timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// The signed-in user
    pub user: User,
}

fn bearer() -> String {
    "bearer".to_string()
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}

impl Session {
    /// Create a new session
    pub fn new(access_token: String, refresh_token: String, user: User, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: bearer(),
            expires_in,
            expires_at: Some(now_secs() + expires_in),
            user,
        }
    }

    /// Fill `expires_at` from `expires_in` when the server left it out
    pub(crate) fn with_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now_secs() + self.expires_in);
        }
        self
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => now_secs() >= expires_at,
            None => false,
        }
    }
}

/// Receives every change of the shared session until dropped.
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    pub(crate) fn new(receiver: watch::Receiver<Option<Session>>) -> Self {
        Self { receiver }
    }

    /// The session as last seen by this subscription
    pub fn current(&self) -> Option<Session> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change.
    ///
    /// Returns `None` once the session context itself is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow().clone())
    }

    /// Release the subscription
    pub fn unsubscribe(self) {}
}
