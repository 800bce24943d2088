//! Authentication routes: the begin/callback/complete flow and logout.
//!
//! `GET /auth/{provider}/callback` serves double duty, mirroring the
//! provider's contract: without a `code` parameter it begins the flow by
//! redirecting to the provider; with one it completes the exchange, mints
//! the session, and redirects to the landing page. `POST /auth/logout`
//! clears the session and always reports success.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration as TimeDuration;

use super::AppState;
use super::provider::{FlowState, ProviderError};
use super::reconcile::{ReconcileError, Reconciler};

/// Flow state cookie name (CSRF token + PKCE verifier during the flow).
const FLOW_STATE_COOKIE: &str = "auth_flow";

/// Query parameters the provider may send to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Begins or completes the OAuth2 flow, depending on callback-parameter
/// presence.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: SignedCookieJar,
) -> Result<Response, AuthError> {
    if provider != state.provider.name() {
        return Err(AuthError::UnknownProvider { name: provider });
    }

    if let Some(reason) = query.error {
        return Err(AuthError::ConsentDenied { reason });
    }

    match query.code {
        Some(code) => complete_login(state, query.state, code, jar).await,
        None => Ok(begin_login(state, jar)),
    }
}

/// Redirects to the provider's authorization endpoint, storing the flow
/// state in a short-lived signed cookie.
///
/// Idempotent per browser session: repeated begins simply re-redirect
/// with fresh flow state. A request already carrying a valid session
/// skips the provider round trip.
fn begin_login(state: AppState, jar: SignedCookieJar) -> Response {
    if state.sessions.read_session(&jar).is_some() {
        return Redirect::to(&state.post_login_url).into_response();
    }

    let (auth_url, flow) = state.provider.begin_authorization();

    let flow_json = serde_json::to_string(&flow).expect("serialize flow state");
    let flow_cookie = Cookie::build((FLOW_STATE_COOKIE, flow_json))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::minutes(10));

    (jar.add(flow_cookie), Redirect::to(&auth_url)).into_response()
}

/// Completes the exchange: validates the flow state, trades the code for
/// an identity, reconciles it to a local user, and mints the session.
async fn complete_login(
    state: AppState,
    callback_state: Option<String>,
    code: String,
    jar: SignedCookieJar,
) -> Result<Response, AuthError> {
    let flow_cookie = jar
        .get(FLOW_STATE_COOKIE)
        .ok_or(AuthError::MissingFlowState)?;

    let flow: FlowState =
        serde_json::from_str(flow_cookie.value()).map_err(|_| AuthError::InvalidFlowState)?;

    if callback_state.as_deref() != Some(flow.csrf_token.as_str()) {
        return Err(AuthError::StateMismatch);
    }

    let identity = state
        .provider
        .complete_authorization(&code, &flow)
        .await
        .map_err(AuthError::from)?;

    let user = Reconciler::new(state.store.clone())
        .reconcile(&identity)
        .await
        .map_err(AuthError::from)?;

    tracing::info!(user_id = %user.id(), "login complete");

    let session = state.sessions.create_session(&user);
    let remove_flow_state = Cookie::build((FLOW_STATE_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    let jar = jar
        .add(state.sessions.session_cookie(&session))
        .add(remove_flow_state);

    Ok((jar, Redirect::to(&state.post_login_url)).into_response())
}

/// Structured body returned by logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    message: &'static str,
}

/// Logs out by clearing the session cookie.
///
/// Idempotent: logging out without a session, or twice, still succeeds.
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let jar = match state.sessions.read_session(&jar) {
        Some(session) => jar.add(state.sessions.invalidation_cookie(&session)),
        None => jar.add(state.sessions.removal_cookie()),
    };
    (
        jar,
        Json(LogoutResponse {
            message: "Logged out successfully",
        }),
    )
}

/// Authentication errors, rendered as structured JSON bodies.
#[derive(Debug)]
pub enum AuthError {
    /// The callback path names a provider other than the configured one.
    UnknownProvider { name: String },
    /// No flow state cookie accompanied the completion request.
    MissingFlowState,
    /// The flow state cookie did not parse.
    InvalidFlowState,
    /// The `state` parameter did not match the flow's CSRF token.
    StateMismatch,
    /// The user denied consent at the provider.
    ConsentDenied { reason: String },
    /// The provider rejected the authorization attempt.
    ProviderRejected { reason: String },
    /// The provider could not be reached.
    ProviderUnreachable { details: String },
    /// The user store is down; the login attempt aborted.
    StoreUnavailable { details: String },
}

impl From<ProviderError> for AuthError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Rejected { reason } => Self::ProviderRejected { reason },
            ProviderError::Unreachable { details } => Self::ProviderUnreachable { details },
            ProviderError::Configuration { reason } => Self::ProviderUnreachable {
                details: reason,
            },
        }
    }
}

impl From<ReconcileError> for AuthError {
    fn from(e: ReconcileError) -> Self {
        match e {
            ReconcileError::StoreUnavailable { details } => Self::StoreUnavailable { details },
        }
    }
}

/// Structured error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::UnknownProvider { name } => (
                StatusCode::NOT_FOUND,
                "unknown_provider",
                format!("provider '{}' is not configured", name),
            ),
            Self::MissingFlowState => (
                StatusCode::BAD_REQUEST,
                "invalid_state",
                "missing authentication flow state".to_string(),
            ),
            Self::InvalidFlowState => (
                StatusCode::BAD_REQUEST,
                "invalid_state",
                "invalid authentication flow state".to_string(),
            ),
            Self::StateMismatch => (
                StatusCode::BAD_REQUEST,
                "invalid_state",
                "state parameter mismatch".to_string(),
            ),
            Self::ConsentDenied { reason } => (
                StatusCode::UNAUTHORIZED,
                "provider_error",
                format!("authorization was denied: {}", reason),
            ),
            Self::ProviderRejected { reason } => {
                tracing::warn!(%reason, "provider rejected authorization");
                (
                    StatusCode::UNAUTHORIZED,
                    "provider_error",
                    "authentication failed".to_string(),
                )
            }
            Self::ProviderUnreachable { details } => {
                tracing::error!(%details, "provider unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    "authentication provider unavailable".to_string(),
                )
            }
            Self::StoreUnavailable { details } => {
                tracing::error!(%details, "user store unavailable during login");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "could not save user, try again later".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
