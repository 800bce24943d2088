//! Session cookie minting, validation, and removal.
//!
//! The session travels entirely in a signed cookie; there is no
//! server-side session table. `SignedCookieJar` verifies the signature,
//! this module handles the payload and the validity/expiry check.
//! Every failure mode on read collapses to `None` so access control
//! fails closed.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Duration as ChronoDuration;
use time::Duration as TimeDuration;
use wicket_identity::{Session, User};

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Mints, reads, and clears the session cookie.
#[derive(Debug, Clone)]
pub struct SessionManager {
    ttl_seconds: i64,
    secure: bool,
    http_only: bool,
}

impl SessionManager {
    /// Creates a session manager from configuration.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            ttl_seconds: config.ttl_seconds,
            secure: config.secure_cookies,
            http_only: config.http_only_cookies,
        }
    }

    /// Mints a session carrying a snapshot of the given user.
    #[must_use]
    pub fn create_session(&self, user: &User) -> Session {
        Session::issue(user.clone(), ChronoDuration::seconds(self.ttl_seconds))
    }

    /// Builds the cookie carrying the given session.
    ///
    /// The caller attaches it to a `SignedCookieJar`, which signs the
    /// value on the way out.
    #[must_use]
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.encode()))
            .path("/")
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::seconds(self.ttl_seconds))
            .build()
    }

    /// Extracts and validates the session from the jar.
    ///
    /// `None` if the cookie is missing, fails signature verification,
    /// fails to decode, was invalidated, or has expired.
    #[must_use]
    pub fn read_session(&self, jar: &SignedCookieJar) -> Option<Session> {
        let cookie = jar.get(SESSION_COOKIE)?;
        Session::decode(cookie.value()).filter(Session::is_active)
    }

    /// Builds the cookie that invalidates the given session: the payload
    /// is the tombstone (validity cleared, expiry in the past) and the
    /// max-age instructs the client to discard it.
    #[must_use]
    pub fn invalidation_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.invalidated().encode()))
            .path("/")
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(TimeDuration::ZERO)
            .build()
    }

    /// Builds the cookie that instructs the client to discard the session
    /// when there is no session to invalidate.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .max_age(TimeDuration::ZERO)
            .build()
    }
}
