//! User domain type.
//!
//! The User is the local account record tied to exactly one external
//! identity. It is created by the reconciler on a user's first login and
//! owned by the persistent store afterwards.

use serde::{Deserialize, Serialize};
use wicket_core::UserId;

/// A local account record.
///
/// The `id` is assigned by the store; `external_id` is the provider's
/// unique identifier and carries a uniqueness constraint in the store.
/// Profile fields are captured at first login and intentionally not
/// refreshed on later logins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal store-assigned user ID.
    id: UserId,
    /// Provider's unique identifier for this user.
    external_id: String,
    /// Display name captured at first login.
    name: String,
    /// Email address captured at first login.
    email: String,
    /// Profile picture URL, empty when none was supplied.
    picture: String,
}

impl User {
    /// Creates a user record, typically when reconstituting from storage.
    #[must_use]
    pub fn new(
        id: UserId,
        external_id: String,
        name: String,
        email: String,
        picture: String,
    ) -> Self {
        Self {
            id,
            external_id,
            name,
            email,
            picture,
        }
    }

    /// Returns the internal store-assigned ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the provider's unique identifier for this user.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the profile picture URL, empty when none was supplied.
    #[must_use]
    pub fn picture(&self) -> &str {
        &self.picture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            UserId::from_i64(1),
            "ext-1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            String::new(),
        )
    }

    #[test]
    fn user_preserves_fields() {
        let user = test_user();

        assert_eq!(user.id(), UserId::from_i64(1));
        assert_eq!(user.external_id(), "ext-1");
        assert_eq!(user.name(), "Ada");
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.picture(), "");
    }

    #[test]
    fn user_serialization_roundtrip() {
        let user = test_user();

        let json = serde_json::to_string(&user).expect("serialize");
        let parsed: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(user, parsed);
    }
}
