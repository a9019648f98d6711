//! Stand-in payment gateway.
//!
//! Every charge is approved. The reference has the shape a real processor
//! would return so the confirmation page can show it.

use corner_store_core::{Price, Username};
use uuid::Uuid;

/// An approved charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Processor reference for the charge.
    pub reference: String,
    /// Amount charged.
    pub amount: Price,
}

/// Charge `amount` to `username`. Always approves.
#[tracing::instrument(skip_all, fields(username = %username, amount = %amount))]
pub fn charge(username: &Username, amount: Price) -> PaymentReceipt {
    let reference = format!("pay_{}", Uuid::new_v4().simple());
    tracing::info!(%reference, "Payment approved");
    PaymentReceipt { reference, amount }
}
