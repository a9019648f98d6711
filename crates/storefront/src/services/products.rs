//! Product catalog service.

use sqlx::SqlitePool;

use corner_store_core::{NewProduct, Product, ProductId, ProductValidationError};

use super::StoreError;
use crate::db::ProductRepository;

/// Catalog operations with input validation on top of the repository.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// List all products ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.list().await?)
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if `id` is not positive and
    /// `StoreError::NotFound` if no product has it.
    pub async fn get(&self, id: ProductId) -> Result<Product, StoreError> {
        require_positive(id)?;
        self.products
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("product {id} not found")))
    }

    /// Add a product and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the insert fails.
    #[tracing::instrument(skip(self, product), fields(name = %product.name))]
    pub async fn add(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let created = self.products.create(product).await?;
        tracing::info!(product_id = %created.id, "Product added");
        Ok(created)
    }

    /// Set a product's quantity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if `qty` is negative or the product
    /// does not exist; the stored quantity is left unchanged.
    pub async fn update_qty(&self, id: ProductId, qty: i64) -> Result<(), StoreError> {
        if qty < 0 {
            return Err(ProductValidationError::NegativeQuantity.into());
        }
        require_positive(id)?;
        if !self.products.update_qty(id, qty).await? {
            return Err(StoreError::Validation(format!("no product with id {id}")));
        }
        tracing::info!(product_id = %id, qty, "Product quantity updated");
        Ok(())
    }

    /// Overwrite every field of a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, product: &NewProduct) -> Result<(), StoreError> {
        require_positive(id)?;
        if !self.products.update(id, product).await? {
            return Err(StoreError::NotFound(format!("product {id} not found")));
        }
        tracing::info!(product_id = %id, "Product updated");
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        if !self.products.delete(id).await? {
            return Err(StoreError::NotFound(format!("product {id} not found")));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

/// Reject IDs that can never name a stored row.
pub(crate) fn require_positive(id: ProductId) -> Result<(), StoreError> {
    if id.is_positive() {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "product id must be positive, got {id}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_store_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::Databases;

    fn sample() -> NewProduct {
        NewProduct::new("Teapot", "Holds tea", Price::new(Decimal::new(1500, 2)), 5).unwrap()
    }

    #[tokio::test]
    async fn test_get_rejects_non_positive_id() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);

        for raw in [0, -3] {
            assert!(matches!(
                service.get(ProductId::new(raw)).await,
                Err(StoreError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);

        assert!(matches!(
            service.get(ProductId::new(12)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_qty_leaves_stock_unchanged() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);
        let product = service.add(&sample()).await.unwrap();

        assert!(matches!(
            service.update_qty(product.id, -1).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(service.get(product.id).await.unwrap().qty, 5);

        service.update_qty(product.id, 0).await.unwrap();
        assert_eq!(service.get(product.id).await.unwrap().qty, 0);
    }

    #[tokio::test]
    async fn test_update_qty_on_missing_product_is_validation_error() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);

        assert!(matches!(
            service.update_qty(ProductId::new(77), 3).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);
        let missing = ProductId::new(5);

        assert!(matches!(
            service.update(missing, &sample()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(missing).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_product() {
        let db = Databases::in_memory().await.unwrap();
        let service = ProductService::new(&db.products);
        let product = service.add(&sample()).await.unwrap();

        service.delete(product.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
