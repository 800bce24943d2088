//! Authentication module for the wicket server.
//!
//! This module provides:
//! - The OAuth2 authorization-code flow against a single configured
//!   provider (begin, callback, logout routes)
//! - Stateless, signed session cookies holding a typed user snapshot
//! - Reconciliation of external identities onto local user records
//! - The `RequireUser` extractor gating protected routes
//!
//! # Access model
//!
//! A request is either carried by a fully active session (signed cookie,
//! unexpired, not invalidated) or treated as unauthenticated. There are no
//! partial-trust states: any cookie that fails signature verification,
//! decoding, or the validity/expiry check is handled exactly like a
//! missing cookie.

pub mod middleware;
pub mod provider;
pub mod reconcile;
pub mod routes;
pub mod session;
pub mod store;

pub use middleware::RequireUser;
pub use provider::{AuthorizationProvider, GoogleProvider};
pub use reconcile::Reconciler;
pub use routes::{callback, logout};
pub use session::SessionManager;
pub use store::{PgUserStore, UserStore};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Persistent user store.
    pub store: Arc<dyn UserStore>,
    /// The configured OAuth2 provider.
    pub provider: Arc<dyn AuthorizationProvider>,
    /// Session cookie minting and validation.
    pub sessions: SessionManager,
    /// Key for signing and verifying cookies.
    cookie_key: Key,
    /// Where to send the browser after a successful login.
    pub post_login_url: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        store: Arc<dyn UserStore>,
        provider: Arc<dyn AuthorizationProvider>,
        sessions: SessionManager,
        cookie_key: Key,
        post_login_url: String,
    ) -> Self {
        Self {
            store,
            provider,
            sessions,
            cookie_key,
            post_login_url,
        }
    }
}

/// Lets `SignedCookieJar` obtain the signing key from state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
