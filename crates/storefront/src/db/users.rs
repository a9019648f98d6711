//! User repository for the account database.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use corner_store_core::{UserId, Username};

use super::RepositoryError;
use crate::models::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    id: UserId,
    username: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}

fn to_user(id: UserId, username: &str, created_at: DateTime<Utc>) -> Result<User, RepositoryError> {
    let username = Username::parse(username).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
    })?;

    Ok(User {
        id,
        username,
        created_at,
    })
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| to_user(r.id, &r.username, r.created_at))
            .transpose()
    }

    /// Create a new user with a password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, created_at
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        to_user(row.id, &row.username, row.created_at)
    }

    /// Get a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT id, username, created_at, password_hash FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((to_user(r.id, &r.username, r.created_at)?, r.password_hash)))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::Databases;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = Databases::in_memory().await.unwrap();
        let repo = UserRepository::new(&db.accounts);
        let alice = Username::parse("alice").unwrap();

        let user = repo.create(&alice, "$argon2id$stub").await.unwrap();
        assert_eq!(user.username, alice);

        let found = repo.get_by_username(&alice).await.unwrap();
        assert_eq!(found, Some(user.clone()));

        let (with_hash, hash) = repo.get_password_hash(&alice).await.unwrap().unwrap();
        assert_eq!(with_hash.id, user.id);
        assert_eq!(hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = Databases::in_memory().await.unwrap();
        let repo = UserRepository::new(&db.accounts);
        let bob = Username::parse("bob").unwrap();

        repo.create(&bob, "hash").await.unwrap();
        let err = repo.create(&bob, "other").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_username() {
        let db = Databases::in_memory().await.unwrap();
        let repo = UserRepository::new(&db.accounts);
        let ghost = Username::parse("ghost").unwrap();

        assert!(repo.get_by_username(&ghost).await.unwrap().is_none());
        assert!(repo.get_password_hash(&ghost).await.unwrap().is_none());
    }
}
