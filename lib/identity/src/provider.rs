//! OAuth2 provider client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the OAuth2 authorization provider.
///
/// Fields with defaults can be omitted when loading from environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the OAuth2 callback
    /// (e.g., "http://localhost:3000/auth/google/callback").
    redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,email,profile"
    #[serde(default = "default_scopes")]
    scopes: String,
}

fn default_scopes() -> String {
    "openid,email,profile".to_string()
}

impl ProviderConfig {
    /// Creates a provider configuration with default scopes.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes: default_scopes(),
        }
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the OAuth2 scopes to request, parsed from the
    /// comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.split(',').map(str::trim).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_default_scopes() {
        let config = ProviderConfig::new(
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://localhost:3000/auth/google/callback".to_string(),
        );

        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(
            config.redirect_uri(),
            "http://localhost:3000/auth/google/callback"
        );
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/auth/google/callback"
        }"#;

        let config: ProviderConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.client_id(), "my-client");
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/auth/google/callback",
            "scopes": "openid, email, profile, drive"
        }"#;

        let config: ProviderConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.scopes(), vec!["openid", "email", "profile", "drive"]);
    }
}
