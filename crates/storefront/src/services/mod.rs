//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `products` - Catalog reads and administration
//! - `cart` - Per-user cart of product references
//! - `checkout` - Cart totals and checkout completion
//! - `payment` - Stand-in payment gateway
//! - `auth` - Password accounts and session tokens

pub mod auth;
pub mod cart;
pub mod checkout;
mod error;
pub mod payment;
pub mod products;

pub use cart::CartService;
pub use checkout::{CheckoutLine, CheckoutService, CheckoutSummary, Receipt};
pub use error::StoreError;
pub use products::ProductService;
