//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use corner_store_core::{UserId, Username};

/// A registered shop account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name; also keys the user's cart.
    pub username: Username,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
