//! Access gate extractor for protected routes.
//!
//! This is an API-style gate: an unauthenticated request gets a
//! structured 401 body, never a redirect. The admitted user snapshot is
//! handed to the handler for that request only.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Key;
use serde::Serialize;
use wicket_identity::User;

use super::AppState;

/// Extractor requiring an authenticated user.
///
/// Admits the session's user snapshot; rejects with a 401 JSON body
/// carrying no user data when no valid session is present.
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let jar = SignedCookieJar::from_headers(&parts.headers, Key::from_ref(&app));

        let session = app
            .sessions
            .read_session(&jar)
            .ok_or(GateRejection::NoSession)?;

        Ok(RequireUser(session.user().clone()))
    }
}

/// Rejection for the access gate.
#[derive(Debug)]
pub enum GateRejection {
    /// No valid session accompanied the request.
    NoSession,
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: &'static str,
    message: &'static str,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NoSession => (
                StatusCode::UNAUTHORIZED,
                Json(RejectionBody {
                    error: "unauthorized",
                    message: "authentication required",
                }),
            )
                .into_response(),
        }
    }
}
