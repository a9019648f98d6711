//! Corner Store Core - Shared types library.
//!
//! This crate provides common types used across all Corner Store components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout, auth)
//! - `cli` - Command-line tools for migrations, seeding and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. The optional `sqlite` feature adds `sqlx` encode/decode
//! implementations for the ID newtypes so repositories can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, usernames, prices, products and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
