//! Cart repository for the cart database.
//!
//! A cart row holds its contents as a JSON array of product IDs. Every
//! mutation is a read-modify-write of that array, so each one runs inside a
//! transaction that takes the write lock before reading.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use sqlx::{Sqlite, SqlitePool, Transaction};

use corner_store_core::{Cart, CartId, ProductId, Username, remove_first};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    contents: Option<String>,
    cost: Option<f64>,
}

impl CartRow {
    fn into_cart(self, username: &Username) -> Cart {
        let contents = parse_contents(self.contents.as_deref(), username);
        Cart {
            id: self.id,
            username: username.clone(),
            contents,
            cost: self.cost.and_then(Decimal::from_f64).unwrap_or_default(),
        }
    }
}

/// Decode stored cart contents.
///
/// A missing or malformed value is treated as an empty cart.
#[must_use]
pub fn parse_contents(raw: Option<&str>, username: &Username) -> Vec<ProductId> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<ProductId>>(raw) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                username = %username,
                error = %e,
                "Malformed cart contents, treating as empty"
            );
            Vec::new()
        }
    }
}

fn encode_contents(contents: &[ProductId]) -> Result<String, RepositoryError> {
    serde_json::to_string(contents)
        .map_err(|e| RepositoryError::DataCorruption(format!("cart contents: {e}")))
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user's cart, if one has been created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, username: &Username) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, contents, cost FROM carts WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| r.into_cart(username)))
    }

    /// Append a product reference, creating the cart if needed.
    ///
    /// Returns the updated contents.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn append(
        &self,
        username: &Username,
        product_id: ProductId,
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let mut tx = self.begin_locked(username).await?;

        let mut contents = load_contents(&mut tx, username).await?;
        contents.push(product_id);
        store_contents(&mut tx, username, &contents).await?;

        tx.commit().await?;
        Ok(contents)
    }

    /// Remove the first occurrence of a product reference.
    ///
    /// Returns `false` (and writes nothing) if the cart does not contain it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn remove_first(
        &self,
        username: &Username,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.begin_locked(username).await?;

        let mut contents = load_contents(&mut tx, username).await?;
        if !remove_first(&mut contents, product_id) {
            tx.rollback().await?;
            return Ok(false);
        }
        store_contents(&mut tx, username, &contents).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a user's cart row.
    ///
    /// Returns `false` if the user had no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, username: &Username) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE username = ?")
            .bind(username.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Begin a transaction that already holds the database write lock.
    ///
    /// `SQLite` takes the write lock on the first write statement, so a
    /// no-op update runs before the contents are read. Concurrent mutations
    /// of the same cart then serialize instead of losing updates.
    async fn begin_locked(
        &self,
        username: &Username,
    ) -> Result<Transaction<'static, Sqlite>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE carts SET cost = cost WHERE username = ?")
            .bind(username.as_str())
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

async fn load_contents(
    tx: &mut Transaction<'static, Sqlite>,
    username: &Username,
) -> Result<Vec<ProductId>, RepositoryError> {
    let raw: Option<Option<String>> =
        sqlx::query_scalar("SELECT contents FROM carts WHERE username = ?")
            .bind(username.as_str())
            .fetch_optional(&mut **tx)
            .await?;

    Ok(parse_contents(raw.flatten().as_deref(), username))
}

async fn store_contents(
    tx: &mut Transaction<'static, Sqlite>,
    username: &Username,
    contents: &[ProductId],
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO carts (username, contents, cost)
        VALUES (?, ?, 0)
        ON CONFLICT(username) DO UPDATE SET contents = excluded.contents
        ",
    )
    .bind(username.as_str())
    .bind(encode_contents(contents)?)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::Databases;

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    #[tokio::test]
    async fn test_append_creates_cart() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);

        assert!(repo.get(&alice()).await.unwrap().is_none());

        let contents = repo.append(&alice(), ProductId::new(3)).await.unwrap();
        assert_eq!(contents, ids(&[3]));

        let cart = repo.get(&alice()).await.unwrap().unwrap();
        assert_eq!(cart.contents, ids(&[3]));
        assert_eq!(cart.cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_append_keeps_duplicates_in_order() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);

        for id in [2, 5, 2] {
            repo.append(&alice(), ProductId::new(id)).await.unwrap();
        }

        let cart = repo.get(&alice()).await.unwrap().unwrap();
        assert_eq!(cart.contents, ids(&[2, 5, 2]));
    }

    #[tokio::test]
    async fn test_remove_first_occurrence_only() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);

        for id in [4, 7, 4] {
            repo.append(&alice(), ProductId::new(id)).await.unwrap();
        }

        assert!(repo.remove_first(&alice(), ProductId::new(4)).await.unwrap());
        assert!(!repo.remove_first(&alice(), ProductId::new(9)).await.unwrap());

        let cart = repo.get(&alice()).await.unwrap().unwrap();
        assert_eq!(cart.contents, ids(&[7, 4]));
    }

    #[tokio::test]
    async fn test_remove_from_missing_cart() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);

        assert!(!repo.remove_first(&alice(), ProductId::new(1)).await.unwrap());
        assert!(repo.get(&alice()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cart() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);

        repo.append(&alice(), ProductId::new(1)).await.unwrap();
        assert!(repo.delete(&alice()).await.unwrap());
        assert!(!repo.delete(&alice()).await.unwrap());
        assert!(repo.get(&alice()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let db = Databases::in_memory().await.unwrap();
        let repo = CartRepository::new(&db.carts);
        let bob = Username::parse("bob").unwrap();

        repo.append(&alice(), ProductId::new(1)).await.unwrap();
        repo.append(&bob, ProductId::new(2)).await.unwrap();

        assert_eq!(repo.get(&alice()).await.unwrap().unwrap().contents, ids(&[1]));
        assert_eq!(repo.get(&bob).await.unwrap().unwrap().contents, ids(&[2]));
    }

    #[tokio::test]
    async fn test_malformed_contents_read_as_empty() {
        let db = Databases::in_memory().await.unwrap();
        sqlx::query("INSERT INTO carts (username, contents, cost) VALUES ('alice', 'not json', 0)")
            .execute(&db.carts)
            .await
            .unwrap();
        let repo = CartRepository::new(&db.carts);

        let cart = repo.get(&alice()).await.unwrap().unwrap();
        assert!(cart.contents.is_empty());

        let contents = repo.append(&alice(), ProductId::new(8)).await.unwrap();
        assert_eq!(contents, ids(&[8]));
    }

    #[test]
    fn test_parse_contents_handles_null_and_blank() {
        assert!(parse_contents(None, &alice()).is_empty());
        assert!(parse_contents(Some(""), &alice()).is_empty());
        assert_eq!(parse_contents(Some("[1,1,2]"), &alice()), ids(&[1, 1, 2]));
    }
}
