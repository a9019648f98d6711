//! Catalog product types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors raised while building a [`NewProduct`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// One or more required fields were not supplied.
    #[error("missing required product fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// The name is empty or whitespace.
    #[error("product name cannot be blank")]
    BlankName,
    /// The cost could not be parsed as a decimal.
    #[error("invalid product cost: {0}")]
    InvalidCost(String),
    /// The quantity could not be parsed as an integer.
    #[error("invalid product quantity: {0}")]
    InvalidQuantity(String),
    /// The cost is below zero.
    #[error("product cost cannot be negative")]
    NegativeCost,
    /// The cost is above [`NewProduct::MAX_COST`].
    #[error("product cost cannot exceed {}", NewProduct::MAX_COST)]
    CostTooLarge,
    /// The quantity is below zero.
    #[error("quantity cannot be negative")]
    NegativeQuantity,
}

/// A stored catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit cost.
    pub cost: Price,
    /// Units on hand. Display-only: checkout never decrements it.
    pub qty: i64,
}

/// A validated product ready to be inserted or written over an existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub cost: Price,
    pub qty: i64,
}

impl NewProduct {
    /// Highest accepted unit cost.
    ///
    /// Costs are stored as `REAL` and totals are `Decimal` sums of cost times
    /// quantity; this bound keeps both exact and far from overflow.
    pub const MAX_COST: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    /// Build a product from typed values.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the cost or quantity is
    /// negative, or the cost exceeds [`Self::MAX_COST`].
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        cost: Price,
        qty: i64,
    ) -> Result<Self, ProductValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ProductValidationError::BlankName);
        }
        if cost.is_negative() {
            return Err(ProductValidationError::NegativeCost);
        }
        if cost.amount() > Self::MAX_COST {
            return Err(ProductValidationError::CostTooLarge);
        }
        if qty < 0 {
            return Err(ProductValidationError::NegativeQuantity);
        }

        Ok(Self {
            name,
            description: description.into(),
            cost,
            qty,
        })
    }

    /// Build a product from raw text fields (HTML form or command line).
    ///
    /// All four fields are required; the description may be empty but must be
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` listing every absent field, or the first parse
    /// or range error otherwise.
    pub fn parse(
        name: Option<&str>,
        description: Option<&str>,
        cost: Option<&str>,
        qty: Option<&str>,
    ) -> Result<Self, ProductValidationError> {
        let missing: Vec<&'static str> = [
            ("name", name.is_none()),
            ("description", description.is_none()),
            ("cost", cost.is_none()),
            ("qty", qty.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        let (Some(name), Some(description), Some(cost), Some(qty)) = (name, description, cost, qty)
        else {
            return Err(ProductValidationError::MissingFields(missing));
        };

        let cost = Decimal::from_str(cost.trim())
            .map_err(|e| ProductValidationError::InvalidCost(e.to_string()))?;
        let qty = qty
            .trim()
            .parse::<i64>()
            .map_err(|e| ProductValidationError::InvalidQuantity(e.to_string()))?;

        Self::new(name, description, Price::new(cost), qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_product() {
        let product = NewProduct::parse(
            Some(" Widget "),
            Some("A fine widget"),
            Some("12.50"),
            Some("3"),
        );
        assert_eq!(
            product,
            Ok(NewProduct {
                name: "Widget".to_string(),
                description: "A fine widget".to_string(),
                cost: Price::new(Decimal::new(1250, 2)),
                qty: 3,
            })
        );
    }

    #[test]
    fn test_parse_reports_all_missing_fields() {
        let err = NewProduct::parse(Some("Widget"), None, None, Some("1"));
        assert_eq!(
            err,
            Err(ProductValidationError::MissingFields(vec![
                "description",
                "cost"
            ]))
        );
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert!(matches!(
            NewProduct::parse(Some("W"), Some(""), Some("abc"), Some("1")),
            Err(ProductValidationError::InvalidCost(_))
        ));
        assert!(matches!(
            NewProduct::parse(Some("W"), Some(""), Some("1.00"), Some("1.5")),
            Err(ProductValidationError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        assert_eq!(
            NewProduct::new("  ", "", Price::ZERO, 0),
            Err(ProductValidationError::BlankName)
        );
        assert_eq!(
            NewProduct::new("W", "", Price::new(Decimal::new(-1, 0)), 0),
            Err(ProductValidationError::NegativeCost)
        );
        assert_eq!(
            NewProduct::new("W", "", Price::ZERO, -1),
            Err(ProductValidationError::NegativeQuantity)
        );
    }

    #[test]
    fn test_cost_is_capped() {
        assert!(NewProduct::new("W", "", Price::new(NewProduct::MAX_COST), 1).is_ok());
        assert_eq!(
            NewProduct::parse(
                Some("W"),
                Some(""),
                Some("79228162514264337593543950335"),
                Some("1")
            ),
            Err(ProductValidationError::CostTooLarge)
        );
        assert_eq!(
            NewProduct::new(
                "W",
                "",
                Price::new(NewProduct::MAX_COST + Decimal::new(1, 2)),
                1
            ),
            Err(ProductValidationError::CostTooLarge)
        );
    }

    #[test]
    fn test_empty_description_is_allowed() {
        assert!(NewProduct::parse(Some("W"), Some(""), Some("0"), Some("0")).is_ok());
    }
}
