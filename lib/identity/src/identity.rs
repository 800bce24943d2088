//! The identity asserted by the OAuth2 provider.

use serde::{Deserialize, Serialize};

/// Identity record produced by a successful provider exchange.
///
/// Immutable and never persisted directly; the reconciler maps it onto a
/// local [`User`](crate::User) record, creating one on first sight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    /// The provider's unique identifier for this user (Google `sub` claim).
    provider_user_id: String,
    /// Display name asserted by the provider.
    display_name: String,
    /// Email address asserted by the provider.
    email: String,
    /// Profile picture URL, empty when the provider supplies none.
    avatar_url: String,
}

impl ExternalIdentity {
    /// Creates an identity from provider profile fields.
    #[must_use]
    pub fn new(
        provider_user_id: String,
        display_name: String,
        email: String,
        avatar_url: String,
    ) -> Self {
        Self {
            provider_user_id,
            display_name,
            email,
            avatar_url,
        }
    }

    /// Returns the provider's unique identifier for this user.
    #[must_use]
    pub fn provider_user_id(&self) -> &str {
        &self.provider_user_id
    }

    /// Returns the display name asserted by the provider.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the email address asserted by the provider.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the profile picture URL, empty when none was supplied.
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_preserves_fields() {
        let identity = ExternalIdentity::new(
            "ext-1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "https://pictures.example.com/ada".to_string(),
        );

        assert_eq!(identity.provider_user_id(), "ext-1");
        assert_eq!(identity.display_name(), "Ada");
        assert_eq!(identity.email(), "ada@example.com");
        assert_eq!(identity.avatar_url(), "https://pictures.example.com/ada");
    }

    #[test]
    fn identity_serialization_roundtrip() {
        let identity = ExternalIdentity::new(
            "ext-2".to_string(),
            "Grace".to_string(),
            "grace@example.com".to_string(),
            String::new(),
        );

        let json = serde_json::to_string(&identity).expect("serialize");
        let parsed: ExternalIdentity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(identity, parsed);
    }
}
