//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::StoreError;
use crate::services::auth::AuthError;

/// Whether 500 responses include the underlying error text.
static EXPOSE_DETAILS: AtomicBool = AtomicBool::new(false);

/// Include internal error details in responses (debug mode only).
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_DETAILS.store(enabled, Ordering::Relaxed);
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Product, cart, or checkout operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::Validation(_) => StatusCode::BAD_REQUEST,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Token(_) => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists
                | AuthError::WeakPassword(_)
                | AuthError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Message safe to show the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() && !EXPOSE_DETAILS.load(Ordering::Relaxed) {
            return "Internal server error".to_string();
        }

        match self {
            Self::Store(StoreError::Validation(msg) | StoreError::NotFound(msg)) => msg.clone(),
            Self::Store(StoreError::Repository(_)) => self.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Token(_) => {
                    "Invalid username or password".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this username already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidUsername(err) => err.to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => self.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a username.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    fn corrupt_row() -> RepositoryError {
        RepositoryError::DataCorruption("product 7 has non-finite cost".to_string())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Store(StoreError::NotFound("product 123 not found".to_string()));
        assert_eq!(err.to_string(), "Store error: product 123 not found");

        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Auth error: invalid credentials");
    }

    #[test]
    fn test_store_error_status_codes() {
        assert_eq!(
            get_status(StoreError::Validation("quantity cannot be negative".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(StoreError::NotFound("product 9 not found".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StoreError::Repository(corrupt_row()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::UserAlreadyExists.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::WeakPassword("too short".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Store(StoreError::Repository(corrupt_row()));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::Store(StoreError::Validation("bad cost".into()));
        assert_eq!(err.public_message(), "bad cost");
    }
}
