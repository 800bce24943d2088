//! OAuth2 provider capability.
//!
//! The authorization-code exchange with the third-party provider is
//! reached through the [`AuthorizationProvider`] trait:
//! `begin_authorization` yields the redirect URL plus the flow state to
//! carry across the redirect, and `complete_authorization` exchanges the
//! returned code for an [`ExternalIdentity`].
//!
//! [`GoogleProvider`] is the single configured implementation: OAuth2
//! code flow with PKCE (S256) followed by a userinfo fetch.

use async_trait::async_trait;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RequestTokenError, Scope, TokenResponse, TokenUrl,
    basic::BasicClient,
};
use serde::Deserialize;
use wicket_identity::{ExternalIdentity, ProviderConfig};

/// Google OAuth authorization URL.
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth token URL.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google userinfo endpoint.
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// State carried across the provider redirect.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FlowState {
    /// CSRF token echoed back by the provider as `state`.
    pub csrf_token: String,
    /// PKCE verifier matching the challenge sent with the redirect.
    pub pkce_verifier: String,
}

/// Errors from the provider exchange.
///
/// `Rejected` covers everything the provider refused (bad code, expired
/// grant, denied consent); `Unreachable` covers failures to reach the
/// provider at all. Callers map them to 4xx and 5xx respectively.
#[derive(Debug)]
pub enum ProviderError {
    /// The provider rejected the authorization attempt.
    Rejected { reason: String },
    /// The provider could not be reached or answered malformed.
    Unreachable { details: String },
    /// The provider configuration is invalid.
    Configuration { reason: String },
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "provider rejected authorization: {reason}"),
            Self::Unreachable { details } => write!(f, "provider unreachable: {details}"),
            Self::Configuration { reason } => write!(f, "provider configuration error: {reason}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Capability for the OAuth2 authorization-code flow against a single
/// provider.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// The provider's name as it appears in the callback path.
    fn name(&self) -> &'static str;

    /// Builds the authorization redirect URL and the flow state to carry
    /// across the redirect.
    fn begin_authorization(&self) -> (String, FlowState);

    /// Exchanges the callback code for the asserted identity.
    async fn complete_authorization(
        &self,
        code: &str,
        flow: &FlowState,
    ) -> Result<ExternalIdentity, ProviderError>;
}

/// Google implementation of the provider capability.
#[derive(Clone)]
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
}

impl GoogleProvider {
    /// Creates the provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect URI is not a valid URL.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        // Validate up front so begin/complete can rebuild clients infallibly
        let _ = RedirectUrl::new(config.redirect_uri().to_string()).map_err(|e| {
            ProviderError::Configuration {
                reason: format!("invalid redirect URI: {}", e),
            }
        })?;

        Ok(Self {
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().to_string(),
            redirect_uri: config.redirect_uri().to_string(),
            scopes: config.scopes().iter().map(|s| (*s).to_string()).collect(),
        })
    }
}

#[async_trait]
impl AuthorizationProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn begin_authorization(&self) -> (String, FlowState) {
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(GOOGLE_AUTH_URL.to_string()).expect("valid auth URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_uri.clone()).expect("valid redirect URL"),
            );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = client
            .authorize_url(CsrfToken::new_random)
            .set_pkce_challenge(pkce_challenge);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.url();

        let state = FlowState {
            csrf_token: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        };

        (auth_url.to_string(), state)
    }

    async fn complete_authorization(
        &self,
        code: &str,
        flow: &FlowState,
    ) -> Result<ExternalIdentity, ProviderError> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProviderError::Unreachable {
                details: format!("HTTP client error: {}", e),
            })?;

        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).expect("valid token URL"))
            .set_redirect_uri(
                RedirectUrl::new(self.redirect_uri.clone()).expect("valid redirect URL"),
            );

        let token_result = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(flow.pkce_verifier.clone()))
            .request_async(&http_client)
            .await
            .map_err(|e| match e {
                RequestTokenError::ServerResponse(resp) => ProviderError::Rejected {
                    reason: resp.to_string(),
                },
                other => ProviderError::Unreachable {
                    details: other.to_string(),
                },
            })?;

        let access_token = token_result.access_token().secret().clone();

        let response = http_client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable {
                details: format!("userinfo request failed: {}", e),
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(ProviderError::Rejected {
                reason: format!("userinfo returned {}", status),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Unreachable {
                details: format!("userinfo returned {}", status),
            });
        }

        let profile: UserInfoResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Unreachable {
                    details: format!("userinfo parse failed: {}", e),
                })?;

        Ok(ExternalIdentity::new(
            profile.sub,
            profile.name.unwrap_or_default(),
            profile.email.unwrap_or_default(),
            profile.picture.unwrap_or_default(),
        ))
    }
}

/// Fields of Google's userinfo response that we consume.
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}
