//! Session record carried in the browser cookie.
//!
//! A session is minted after a successful login and holds an immutable
//! snapshot of the user taken at creation time, an expiry, and a validity
//! flag. It travels as an opaque cookie value; the server binary signs the
//! cookie, this module only encodes and decodes the payload.
//!
//! A session is either fully active (valid and unexpired) or rejected
//! outright. Any decode failure yields `None` rather than an error so
//! that callers fail closed.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// An authenticated session bound to a user snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Snapshot of the user at creation time. Later profile changes do
    /// not retroactively alter existing sessions.
    user: User,
    /// When the session expires.
    expires_at: DateTime<Utc>,
    /// Whether the session is still valid. Cleared by logout.
    valid: bool,
}

impl Session {
    /// Mints a session for the given user, valid for `ttl` from now.
    #[must_use]
    pub fn issue(user: User, ttl: Duration) -> Self {
        Self {
            user,
            expires_at: Utc::now() + ttl,
            valid: true,
        }
    }

    /// Returns the user snapshot taken when the session was minted.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session is valid and unexpired.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.valid && !self.is_expired()
    }

    /// Returns an invalidated copy: validity cleared and expiry in the past.
    #[must_use]
    pub fn invalidated(&self) -> Self {
        Self {
            user: self.user.clone(),
            expires_at: Utc::now() - Duration::days(1),
            valid: false,
        }
    }

    /// Encodes the session as an opaque cookie value.
    #[must_use]
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("session serializes");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a cookie value back into a session.
    ///
    /// Any failure (bad base64, bad JSON, wrong shape) is `None`.
    #[must_use]
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
