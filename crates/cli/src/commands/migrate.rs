//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! cs-cli migrate products
//! cs-cli migrate carts
//! cs-cli migrate accounts
//! cs-cli migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `PRODUCTS_DATABASE_URL` - product store (default `sqlite://products.db`)
//! - `CARTS_DATABASE_URL` - cart store (default `sqlite://carts.db`)
//! - `ACCOUNTS_DATABASE_URL` - account store (default `sqlite://accounts.db`)
//!
//! Database files are created if missing. Migrations are embedded from
//! `crates/storefront/migrations/<store>/`.

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;

use corner_store_storefront::config::DatabaseUrls;
use corner_store_storefront::db::{
    ACCOUNTS_MIGRATOR, CARTS_MIGRATOR, PRODUCTS_MIGRATOR, create_pool,
};

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

fn database_urls() -> DatabaseUrls {
    dotenvy::dotenv().ok();
    DatabaseUrls::from_env()
}

async fn run(store: &str, url: &str, migrator: &Migrator) -> Result<SqlitePool, MigrationError> {
    tracing::info!("Connecting to {store} database...");
    let pool = create_pool(url).await?;

    tracing::info!("Running {store} migrations...");
    migrator.run(&pool).await?;

    tracing::info!("{store} migrations complete");
    Ok(pool)
}

/// Run product store migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn products() -> Result<(), MigrationError> {
    products_pool().await.map(drop)
}

/// Run cart store migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn carts() -> Result<(), MigrationError> {
    let urls = database_urls();
    run("carts", &urls.carts, &CARTS_MIGRATOR).await.map(drop)
}

/// Run account store migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn accounts() -> Result<(), MigrationError> {
    let urls = database_urls();
    run("accounts", &urls.accounts, &ACCOUNTS_MIGRATOR)
        .await
        .map(drop)
}

/// Open the product store, bringing its schema up to date first.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn products_pool() -> Result<SqlitePool, MigrationError> {
    let urls = database_urls();
    run("products", &urls.products, &PRODUCTS_MIGRATOR).await
}
