//! Catalog management commands.
//!
//! These go through the same `ProductService` as the storefront, so the
//! validation rules are identical: negative quantities are refused and a
//! full update needs every field.

use corner_store_core::{NewProduct, Product, ProductId};
use corner_store_storefront::services::ProductService;

use super::migrate::products_pool;

/// Product fields as given on the command line, not yet validated.
#[derive(Debug, Default)]
pub struct RawProduct {
    pub name: Option<String>,
    pub cost: Option<String>,
    pub qty: Option<String>,
    pub description: Option<String>,
}

impl RawProduct {
    fn validate(&self) -> Result<NewProduct, corner_store_core::ProductValidationError> {
        NewProduct::parse(
            self.name.as_deref(),
            self.description.as_deref(),
            self.cost.as_deref(),
            self.qty.as_deref(),
        )
    }
}

#[allow(clippy::print_stdout)]
fn print_product(product: &Product) {
    println!(
        "{:>5}  {:<30}  {:>10}  {:>5}  {}",
        product.id, product.name, product.cost, product.qty, product.description
    );
}

/// Print every product.
///
/// # Errors
///
/// Returns an error if the product store cannot be read.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = products_pool().await?;
    let products = ProductService::new(&pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{:>5}  {:<30}  {:>10}  {:>5}  DESCRIPTION", "ID", "NAME", "COST", "QTY");
    }
    for product in &products {
        print_product(product);
    }
    tracing::info!(count = products.len(), "Listed products");
    Ok(())
}

/// Add a product.
///
/// # Errors
///
/// Returns an error if a field is missing or invalid, or the insert fails.
pub async fn add(raw: &RawProduct) -> Result<(), Box<dyn std::error::Error>> {
    let product = raw.validate()?;
    let pool = products_pool().await?;
    let created = ProductService::new(&pool).add(&product).await?;

    tracing::info!(product_id = %created.id, "Product added");
    print_product(&created);
    Ok(())
}

/// Set a product's stock quantity.
///
/// # Errors
///
/// Returns an error if the quantity is negative, the product does not
/// exist, or the update fails.
pub async fn update_qty(id: i64, qty: i64) -> Result<(), Box<dyn std::error::Error>> {
    let pool = products_pool().await?;
    ProductService::new(&pool)
        .update_qty(ProductId::new(id), qty)
        .await?;

    tracing::info!(product_id = id, qty, "Quantity updated");
    Ok(())
}

/// Overwrite every field of a product.
///
/// # Errors
///
/// Returns an error if a field is missing or invalid, the product does not
/// exist, or the update fails.
pub async fn update(id: i64, raw: &RawProduct) -> Result<(), Box<dyn std::error::Error>> {
    let product = raw.validate()?;
    let pool = products_pool().await?;
    ProductService::new(&pool)
        .update(ProductId::new(id), &product)
        .await?;

    tracing::info!(product_id = id, "Product updated");
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the delete fails.
pub async fn delete(id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let pool = products_pool().await?;
    ProductService::new(&pool).delete(ProductId::new(id)).await?;

    tracing::info!(product_id = id, "Product deleted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_listed_together() {
        let raw = RawProduct {
            name: Some("Kettle".to_owned()),
            ..RawProduct::default()
        };

        let err = raw.validate().unwrap_err();
        assert_eq!(
            err,
            corner_store_core::ProductValidationError::MissingFields(vec![
                "description",
                "cost",
                "qty"
            ])
        );
    }

    #[test]
    fn test_complete_fields_validate() {
        let raw = RawProduct {
            name: Some("Kettle".to_owned()),
            cost: Some("24.00".to_owned()),
            qty: Some("3".to_owned()),
            description: Some(String::new()),
        };

        let product = raw.validate().unwrap();
        assert_eq!(product.name, "Kettle");
        assert_eq!(product.qty, 3);
    }
}
