//! Authentication extractors.
//!
//! Handlers that need a logged-in user take [`RequireAuth`]; the token
//! cookie is verified against the server's signing secret on every request.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::models::CurrentUser;
use crate::state::AppState;

use super::session::read_token;

/// Extractor that requires a valid session token.
///
/// If the token is missing, malformed, expired, or signed with another
/// secret, the request is redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`]: always a redirect to `/login`.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state).map(Self).ok_or(AuthRejection)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when there is no
/// valid token.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state)))
    }
}

fn current_user(parts: &Parts, state: &AppState) -> Option<CurrentUser> {
    let token = read_token(&parts.headers)?;

    match state.tokens().verify(&token) {
        Ok(claims) => Some(CurrentUser {
            username: claims.sub,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            None
        }
    }
}
