//! Seed the product store with a sample catalog.
//!
//! Only runs against an empty catalog so it is safe to repeat.

use rust_decimal::Decimal;
use tracing::info;

use corner_store_core::{NewProduct, Price};
use corner_store_storefront::db::ProductRepository;
use corner_store_storefront::services::ProductService;

use super::migrate::products_pool;

/// Sample products: name, description, cost in cents, quantity.
const SAMPLE_CATALOG: &[(&str, &str, i64, i64)] = &[
    ("Coffee beans", "House blend, 250g", 899, 40),
    ("Enamel mug", "Speckled blue, 350ml", 1250, 15),
    ("Notebook", "A5 dotted, 120 pages", 650, 60),
    ("Pencil set", "Six graphite grades", 475, 35),
    ("Tea towel", "Linen, natural", 1100, 20),
    ("Tote bag", "Heavy cotton canvas", 1500, 12),
];

fn sample_products() -> Result<Vec<NewProduct>, corner_store_core::ProductValidationError> {
    SAMPLE_CATALOG
        .iter()
        .map(|&(name, description, cents, qty)| {
            NewProduct::new(name, description, Price::new(Decimal::new(cents, 2)), qty)
        })
        .collect()
}

/// Insert the sample catalog if no products exist yet.
///
/// # Errors
///
/// Returns an error if the product store cannot be opened or an insert
/// fails.
pub async fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    let pool = products_pool().await?;

    let existing = ProductRepository::new(&pool).count().await?;
    if existing > 0 {
        info!(existing, "Catalog already has products, skipping seed");
        return Ok(());
    }

    let service = ProductService::new(&pool);
    for product in sample_products()? {
        let created = service.add(&product).await?;
        info!(product_id = %created.id, name = %created.name, "Seeded product");
    }

    info!(count = SAMPLE_CATALOG.len(), "Catalog seeded");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_is_valid() {
        let products = sample_products().unwrap();
        assert_eq!(products.len(), SAMPLE_CATALOG.len());
        assert!(products.iter().all(|p| !p.cost.is_negative() && p.qty >= 0));
    }
}
