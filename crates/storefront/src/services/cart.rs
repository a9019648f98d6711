//! Cart service.
//!
//! Carts store product IDs only; reads resolve them against the catalog.

use std::collections::HashMap;

use sqlx::SqlitePool;

use corner_store_core::{Product, ProductId, Username};

use super::StoreError;
use super::products::require_positive;
use crate::db::{CartRepository, Databases, ProductRepository};

/// Per-user cart operations.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a cart service over the cart and product stores.
    #[must_use]
    pub const fn new(carts: &'a SqlitePool, products: &'a SqlitePool) -> Self {
        Self {
            carts: CartRepository::new(carts),
            products: ProductRepository::new(products),
        }
    }

    /// Create a cart service from the application databases.
    #[must_use]
    pub const fn from_databases(db: &'a Databases) -> Self {
        Self::new(&db.carts, &db.products)
    }

    /// Stored product IDs in insertion order, duplicates included.
    ///
    /// A user without a cart has empty contents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the query fails.
    pub async fn contents(&self, username: &Username) -> Result<Vec<ProductId>, StoreError> {
        Ok(self
            .carts
            .get(username)
            .await?
            .map(|cart| cart.contents)
            .unwrap_or_default())
    }

    /// The cart's products in insertion order, one entry per stored ID.
    ///
    /// IDs whose product no longer exists are dropped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if a query fails.
    pub async fn get(&self, username: &Username) -> Result<Vec<Product>, StoreError> {
        let contents = self.contents(username).await?;

        let mut resolved: HashMap<ProductId, Option<Product>> = HashMap::new();
        let mut products = Vec::with_capacity(contents.len());
        for id in contents {
            if !resolved.contains_key(&id) {
                let product = self.products.get_by_id(id).await?;
                if product.is_none() {
                    tracing::debug!(%username, product_id = %id, "Dropping stale cart entry");
                }
                resolved.insert(id, product);
            }
            if let Some(Some(product)) = resolved.get(&id) {
                products.push(product.clone());
            }
        }

        Ok(products)
    }

    /// Append a product to the user's cart, creating the cart if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if `product_id` is not positive.
    #[tracing::instrument(skip_all, fields(username = %username, product_id = %product_id))]
    pub async fn add(&self, username: &Username, product_id: ProductId) -> Result<(), StoreError> {
        require_positive(product_id)?;
        let contents = self.carts.append(username, product_id).await?;
        tracing::debug!(items = contents.len(), "Added to cart");
        Ok(())
    }

    /// Remove one occurrence of a product. Absent products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if a query fails.
    #[tracing::instrument(skip_all, fields(username = %username, product_id = %product_id))]
    pub async fn remove(&self, username: &Username, product_id: ProductId) -> Result<(), StoreError> {
        let removed = self.carts.remove_first(username, product_id).await?;
        tracing::debug!(removed, "Removed from cart");
        Ok(())
    }

    /// Delete the user's cart entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the delete fails.
    pub async fn delete(&self, username: &Username) -> Result<(), StoreError> {
        self.carts.delete(username).await?;
        Ok(())
    }
}
