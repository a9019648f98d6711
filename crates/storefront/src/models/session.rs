//! Session-related types.

use serde::{Deserialize, Serialize};

use corner_store_core::Username;

/// The authenticated user for the current request.
///
/// Resolved from the verified token; nothing is stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Subject of the session token.
    pub username: Username,
}
