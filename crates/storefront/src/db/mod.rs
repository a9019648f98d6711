//! Database operations for the storefront `SQLite` stores.
//!
//! # Databases
//!
//! Each store lives in its own `SQLite` file with its own migration set:
//!
//! - `products` - catalog (`products` table)
//! - `carts` - one row per username, contents as a JSON array of product IDs
//! - `accounts` - `users` table with Argon2id password hashes
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/storefront/migrations/<store>/` and
//! run on startup, or explicitly via:
//! ```bash
//! cargo run -p corner-store-cli -- migrate all
//! ```

pub mod carts;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::config::DatabaseUrls;

pub use carts::CartRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded migrations for the product store.
pub static PRODUCTS_MIGRATOR: Migrator = sqlx::migrate!("./migrations/products");

/// Embedded migrations for the cart store.
pub static CARTS_MIGRATOR: Migrator = sqlx::migrate!("./migrations/carts");

/// Embedded migrations for the account store.
pub static ACCOUNTS_MIGRATOR: Migrator = sqlx::migrate!("./migrations/accounts");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Connection pools for the three stores.
///
/// Cloning is cheap; each pool is reference-counted internally.
#[derive(Debug, Clone)]
pub struct Databases {
    pub products: SqlitePool,
    pub carts: SqlitePool,
    pub accounts: SqlitePool,
}

impl Databases {
    /// Open (creating if missing) all three database files.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if any URL is invalid or a connection fails.
    pub async fn connect(urls: &DatabaseUrls) -> Result<Self, sqlx::Error> {
        Ok(Self {
            products: create_pool(&urls.products).await?,
            carts: create_pool(&urls.carts).await?,
            accounts: create_pool(&urls.accounts).await?,
        })
    }

    /// Open three private in-memory databases with migrations applied.
    ///
    /// Each pool holds exactly one long-lived connection, since every
    /// `SQLite` in-memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection or migration fails.
    pub async fn in_memory() -> Result<Self, MigrateError> {
        let databases = Self {
            products: memory_pool().await?,
            carts: memory_pool().await?,
            accounts: memory_pool().await?,
        };
        databases.migrate().await?;
        Ok(databases)
    }

    /// Run every store's embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` if any migration fails.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        PRODUCTS_MIGRATOR.run(&self.products).await?;
        CARTS_MIGRATOR.run(&self.carts).await?;
        ACCOUNTS_MIGRATOR.run(&self.accounts).await?;
        Ok(())
    }

    /// Check every pool can serve a trivial query.
    pub async fn ping(&self) -> bool {
        for pool in [&self.products, &self.carts, &self.accounts] {
            if sqlx::query("SELECT 1").fetch_one(pool).await.is_err() {
                return false;
            }
        }
        true
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist. WAL journaling lets
/// readers proceed while a cart write holds the lock; writers wait up to the
/// busy timeout instead of failing immediately.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
