//! Core types for Corner Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod username;

pub use cart::{Cart, remove_first, tally};
pub use id::*;
pub use price::Price;
pub use product::{NewProduct, Product, ProductValidationError};
pub use username::{Username, UsernameError};
