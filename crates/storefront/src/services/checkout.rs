//! Checkout: totals and completion.

use corner_store_core::{Price, Product, Username, tally};

use super::StoreError;
use super::cart::CartService;
use super::payment::{self, PaymentReceipt};
use crate::db::Databases;

/// One distinct product in a checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart contents priced for checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Distinct products in first-seen order.
    pub lines: Vec<CheckoutLine>,
    /// Sum of every line total.
    pub total: Price,
    /// Number of product references, duplicates counted.
    pub item_count: u32,
}

impl CheckoutSummary {
    /// Price resolved cart products.
    ///
    /// Quantity is the number of times a product appears.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if a line or the total is too large
    /// to represent.
    pub fn from_products(products: &[Product]) -> Result<Self, StoreError> {
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();

        let mut lines = Vec::new();
        for (id, quantity) in tally(&ids) {
            let Some(product) = products.iter().find(|p| p.id == id) else {
                continue;
            };
            let line_total = product
                .cost
                .checked_mul(quantity)
                .ok_or_else(|| total_too_large(&product.name))?;
            lines.push(CheckoutLine {
                product: product.clone(),
                quantity,
                line_total,
            });
        }

        let total = Price::checked_sum(lines.iter().map(|line| line.line_total))
            .ok_or_else(|| total_too_large("cart"))?;

        Ok(Self {
            total,
            item_count: lines.iter().map(|line| line.quantity).sum(),
            lines,
        })
    }

    /// Whether there is nothing to pay for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn total_too_large(what: &str) -> StoreError {
    StoreError::Validation(format!("{what} total is too large to charge"))
}

/// Outcome of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// What was bought.
    pub summary: CheckoutSummary,
    /// The approved charge; `None` when the cart was empty.
    pub payment: Option<PaymentReceipt>,
}

/// Checkout operations for one user's cart.
pub struct CheckoutService<'a> {
    carts: CartService<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service from the application databases.
    #[must_use]
    pub const fn new(db: &'a Databases) -> Self {
        Self {
            carts: CartService::from_databases(db),
        }
    }

    /// Price the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if a query fails, or
    /// `StoreError::Validation` if the total overflows.
    pub async fn checkout(&self, username: &Username) -> Result<CheckoutSummary, StoreError> {
        let products = self.carts.get(username).await?;
        CheckoutSummary::from_products(&products)
    }

    /// Recompute the total, take payment, and clear the cart.
    ///
    /// Stock quantities are not decremented.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if a query fails, or
    /// `StoreError::Validation` if the total overflows; nothing is charged
    /// or cleared in that case.
    #[tracing::instrument(skip_all, fields(username = %username))]
    pub async fn complete_checkout(&self, username: &Username) -> Result<Receipt, StoreError> {
        let summary = self.checkout(username).await?;

        let payment = if summary.is_empty() {
            tracing::info!("Checkout completed with an empty cart");
            None
        } else {
            Some(payment::charge(username, summary.total))
        };

        self.carts.delete(username).await?;
        tracing::info!(total = %summary.total, items = summary.item_count, "Checkout completed");

        Ok(Receipt { summary, payment })
    }
}
