//! Authentication service.
//!
//! Password accounts with Argon2id hashes, and signed session tokens whose
//! subject is the username.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenSigner};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use corner_store_core::Username;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles account registration and login against the account store.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenSigner,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, tokens: &'a TokenSigner) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username.trim())?;

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(username = %user.username, "Account created");
        Ok(user)
    }

    /// Check credentials and issue a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn do_login(&self, username: &str, password: &str) -> Result<(User, String), AuthError> {
        let username =
            Username::parse(username.trim()).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&user.username)?;
        Ok((user, token))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use secrecy::SecretString;

    use super::*;
    use crate::db::Databases;

    fn signer() -> TokenSigner {
        TokenSigner::new(
            SecretString::from("k3y-for-tests-8f2a9c71d04e6b35a1f0".to_owned()),
            Duration::hours(1),
        )
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_then_login() {
        let db = Databases::in_memory().await.unwrap();
        let tokens = signer();
        let auth = AuthService::new(&db.accounts, &tokens);

        auth.sign_up("alice", "password123").await.unwrap();
        let (user, token) = auth.do_login("alice", "password123").await.unwrap();

        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(tokens.verify(&token).unwrap().sub, user.username);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let db = Databases::in_memory().await.unwrap();
        let tokens = signer();
        let auth = AuthService::new(&db.accounts, &tokens);

        auth.sign_up("alice", "password123").await.unwrap();
        assert!(matches!(
            auth.sign_up("alice", "different456").await,
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let db = Databases::in_memory().await.unwrap();
        let tokens = signer();
        let auth = AuthService::new(&db.accounts, &tokens);

        auth.sign_up("alice", "password123").await.unwrap();
        assert!(matches!(
            auth.do_login("alice", "password124").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.do_login("nobody", "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.do_login("not valid!", "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_invalid_username_on_sign_up() {
        let db = Databases::in_memory().await.unwrap();
        let tokens = signer();
        let auth = AuthService::new(&db.accounts, &tokens);

        assert!(matches!(
            auth.sign_up("", "password123").await,
            Err(AuthError::InvalidUsername(_))
        ));
    }
}
