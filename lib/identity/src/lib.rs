//! Identity and session domain types for wicket.
//!
//! This crate provides:
//! - The identity asserted by the OAuth2 provider (`ExternalIdentity`)
//! - The local account record (`User`)
//! - The session record carried in the browser cookie (`Session`)
//! - Provider client configuration (`ProviderConfig`)
//!
//! The crate is pure domain logic: no I/O, no web types. The server binary
//! wires these types to HTTP, the provider exchange, and the user store.
//!
//! # Example
//!
//! ```
//! use wicket_core::UserId;
//! use wicket_identity::{Session, User};
//! use chrono::Duration;
//!
//! // A user reconciled from a provider identity
//! let user = User::new(
//!     UserId::from_i64(1),
//!     "ext-1".to_string(),
//!     "Ada".to_string(),
//!     "ada@example.com".to_string(),
//!     String::new(),
//! );
//!
//! // Mint a session and carry it as an opaque cookie value
//! let session = Session::issue(user, Duration::seconds(8640));
//! assert!(session.is_active());
//!
//! let decoded = Session::decode(&session.encode()).expect("decodes");
//! assert_eq!(decoded.user().email(), "ada@example.com");
//! ```

pub mod identity;
pub mod provider;
pub mod session;
pub mod user;

pub use identity::ExternalIdentity;
pub use provider::ProviderConfig;
pub use session::Session;
pub use user::User;
