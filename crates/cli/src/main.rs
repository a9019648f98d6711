//! Corner Store CLI - database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run every store's migrations
//! cs-cli migrate all
//!
//! # Fill an empty catalog with sample products
//! cs-cli seed
//!
//! # Manage products
//! cs-cli product list
//! cs-cli product add --name "Tea towel" --cost 6.50 --qty 12 --description "Linen"
//! cs-cli product update-qty 3 40
//! cs-cli product delete 3
//! ```
//!
//! Database locations come from `PRODUCTS_DATABASE_URL`, `CARTS_DATABASE_URL`
//! and `ACCOUNTS_DATABASE_URL` (or `.env`), defaulting to local files.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Insert sample products into an empty catalog
    Seed,
    /// Manage catalog products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run product store migrations
    Products,
    /// Run cart store migrations
    Carts,
    /// Run account store migrations
    Accounts,
    /// Run all database migrations
    All,
}

/// Product fields as typed on the command line.
///
/// All are optional here so that missing ones are reported together.
#[derive(clap::Args)]
struct ProductFields {
    /// Product name
    #[arg(short, long)]
    name: Option<String>,

    /// Unit cost, e.g. 12.50
    #[arg(short, long)]
    cost: Option<String>,

    /// Units in stock
    #[arg(short, long)]
    qty: Option<String>,

    /// Free-form description (may be empty)
    #[arg(short, long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Add a product
    Add(ProductFields),
    /// Set a product's stock quantity
    UpdateQty {
        /// Product ID
        id: i64,
        /// New quantity (must not be negative)
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Overwrite every field of a product
    Update {
        /// Product ID
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Products => commands::migrate::products().await?,
            MigrateTarget::Carts => commands::migrate::carts().await?,
            MigrateTarget::Accounts => commands::migrate::accounts().await?,
            MigrateTarget::All => {
                commands::migrate::products().await?;
                commands::migrate::carts().await?;
                commands::migrate::accounts().await?;
            }
        },
        Commands::Seed => commands::seed::catalog().await?,
        Commands::Product { action } => match action {
            ProductAction::List => commands::product::list().await?,
            ProductAction::Add(fields) => commands::product::add(&fields.into()).await?,
            ProductAction::UpdateQty { id, qty } => commands::product::update_qty(id, qty).await?,
            ProductAction::Update { id, fields } => {
                commands::product::update(id, &fields.into()).await?;
            }
            ProductAction::Delete { id } => commands::product::delete(id).await?,
        },
    }
    Ok(())
}

impl From<ProductFields> for commands::product::RawProduct {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            cost: fields.cost,
            qty: fields.qty,
            description: fields.description,
        }
    }
}
