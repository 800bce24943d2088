//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`ProviderConfig`](wicket_identity::ProviderConfig) for the OAuth2
//! provider configuration.

use serde::Deserialize;
use wicket_identity::ProviderConfig;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Where to send the browser after a successful login.
    #[serde(default = "default_post_login_url")]
    pub post_login_url: String,

    /// Session configuration.
    pub session: SessionConfig,

    /// OAuth2 provider configuration.
    pub provider: ProviderConfig,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to derive the cookie signing key.
    /// Must be at least 32 bytes.
    pub signing_secret: String,

    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local
    /// HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Whether to set the HttpOnly flag on cookies.
    #[serde(default = "default_http_only_cookies")]
    pub http_only_cookies: bool,
}

fn default_port() -> u16 {
    3000
}

fn default_post_login_url() -> String {
    "/dashboard".to_string()
}

fn default_session_ttl_seconds() -> i64 {
    8640
}

fn default_secure_cookies() -> bool {
    true
}

fn default_http_only_cookies() -> bool {
    true
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let json = r#"{"signing_secret": "0123456789abcdef0123456789abcdef"}"#;
        let config: SessionConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.ttl_seconds, 8640);
        assert!(config.secure_cookies);
        assert!(config.http_only_cookies);
    }

    #[test]
    fn server_config_defaults_port_and_landing() {
        let json = r#"{
            "database_url": "postgres://localhost/wicket",
            "session": {"signing_secret": "0123456789abcdef0123456789abcdef"},
            "provider": {
                "client_id": "id",
                "client_secret": "secret",
                "redirect_uri": "http://localhost:3000/auth/google/callback"
            }
        }"#;
        let config: ServerConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.port, 3000);
        assert_eq!(config.post_login_url, "/dashboard");
    }
}
