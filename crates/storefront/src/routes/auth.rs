//! Authentication route handlers.
//!
//! Login issues a signed token in the `token` cookie; registration creates a
//! password account and sends the user to the login page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, expired_token_cookie, token_cookie};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub username: String,
}

/// Map a query flag to a user-facing message.
fn success_message(code: &str) -> String {
    match code {
        "registered" => "Account created. Please sign in.".to_string(),
        "logged_out" => "You have been signed out.".to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// GET /login - display the login page.
pub async fn login_page(auth: OptionalAuth, Query(query): Query<MessageQuery>) -> LoginTemplate {
    LoginTemplate {
        current_user: auth.0.map(|user| user.username.to_string()),
        error: query.error,
        success: query.success.as_deref().map(success_message),
        username: String::new(),
    }
}

/// POST /login - check credentials and set the token cookie.
///
/// Bad credentials re-render the form with 401.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let auth = AuthService::new(&state.db().accounts, state.tokens());

    match auth.do_login(&form.username, &form.password).await {
        Ok((user, token)) => {
            set_sentry_user(user.username.as_str());
            tracing::info!("Login succeeded");

            let cookie = token_cookie(
                token,
                state.config().secure_cookies(),
                state.tokens().ttl(),
            );
            Ok((
                [(SET_COOKIE, cookie.to_string())],
                Redirect::to("/browse"),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed");
            let page = LoginTemplate {
                current_user: None,
                error: Some("Invalid username or password".to_string()),
                success: None,
                username: form.username,
            };
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

/// POST /logout - expire the token cookie.
pub async fn logout(State(state): State<AppState>) -> Response {
    clear_sentry_user();
    let cookie = expired_token_cookie(state.config().secure_cookies());

    (
        [(SET_COOKIE, cookie.to_string())],
        Redirect::to("/login?success=logged_out"),
    )
        .into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// GET /register - display the registration page.
pub async fn register_page(
    auth: OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        current_user: auth.0.map(|user| user.username.to_string()),
        error: query.error,
        username: String::new(),
    }
}

/// POST /register - create an account.
///
/// Invalid or duplicate input re-renders the form with 400.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let auth = AuthService::new(&state.db().accounts, state.tokens());

    match auth.sign_up(&form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login?success=registered").into_response()),
        Err(
            e @ (AuthError::InvalidUsername(_)
            | AuthError::WeakPassword(_)
            | AuthError::UserAlreadyExists),
        ) => {
            tracing::warn!(error = %e, "Registration rejected");
            let page = RegisterTemplate {
                current_user: None,
                error: Some(AppError::Auth(e).public_message()),
                username: form.username,
            };
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message_codes() {
        assert_eq!(
            success_message("registered"),
            "Account created. Please sign in."
        );
        assert_eq!(success_message("custom"), "custom");
    }
}
