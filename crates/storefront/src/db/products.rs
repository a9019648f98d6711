//! Product repository for the catalog database.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sqlx::SqlitePool;

use corner_store_core::{NewProduct, Price, Product, ProductId};

use super::RepositoryError;

/// Raw `products` row; `cost` is stored as `REAL`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    cost: f64,
    qty: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let cost = Decimal::from_f64(row.cost).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "product {} has non-finite cost {}",
                row.id, row.cost
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            cost: Price::new(cost),
            qty: row.qty,
        })
    }
}

/// Convert a price to the `REAL` column representation.
fn cost_to_real(cost: Price) -> Result<f64, RepositoryError> {
    cost.amount()
        .to_f64()
        .ok_or_else(|| RepositoryError::DataCorruption(format!("cost {cost} is out of range")))
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product ordered by name.
    ///
    /// Rows whose cost cannot be represented are logged and left out so one
    /// bad row does not hide the rest of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, cost, qty FROM products ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Product::try_from(row)
                    .inspect_err(|e| tracing::warn!(error = %e, "Skipping unreadable product"))
                    .ok()
            })
            .collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, cost, qty FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a product and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, cost, qty)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, description, cost, qty
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(cost_to_real(product.cost)?)
        .bind(product.qty)
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }

    /// Set a product's quantity.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_qty(&self, id: ProductId, qty: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE products SET qty = ? WHERE id = ?")
            .bind(qty)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite every field of a product.
    ///
    /// Returns `false` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, id: ProductId, product: &NewProduct) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = ?, description = ?, cost = ?, qty = ?
            WHERE id = ?
            ",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(cost_to_real(product.cost)?)
        .bind(product.qty)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product.
    ///
    /// Returns `false` if no product has this ID. Carts referencing it are
    /// left untouched; the stale ID is dropped when the cart is resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count stored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
