//! Shopping cart type.
//!
//! A cart stores product references only. Quantity is expressed by
//! repetition: adding the same product twice stores its ID twice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartId, ProductId};
use super::username::Username;

/// A user's cart as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub username: Username,
    /// Product IDs in insertion order, duplicates allowed.
    pub contents: Vec<ProductId>,
    /// Stored alongside the contents but never computed; always zero.
    pub cost: Decimal,
}

/// Remove the first occurrence of `product_id` from `contents`.
///
/// Returns `true` if an occurrence was removed.
pub fn remove_first(contents: &mut Vec<ProductId>, product_id: ProductId) -> bool {
    match contents.iter().position(|id| *id == product_id) {
        Some(index) => {
            contents.remove(index);
            true
        }
        None => false,
    }
}

/// Group product references by ID, preserving first-seen order.
///
/// Returns `(id, occurrences)` pairs.
#[must_use]
pub fn tally(contents: &[ProductId]) -> Vec<(ProductId, u32)> {
    let mut counts: Vec<(ProductId, u32)> = Vec::new();
    for id in contents {
        match counts.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, count)) => *count += 1,
            None => counts.push((*id, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_remove_first_only_removes_one() {
        let mut contents = ids(&[4, 7, 4]);
        assert!(remove_first(&mut contents, ProductId::new(4)));
        assert_eq!(contents, ids(&[7, 4]));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut contents = ids(&[1, 2]);
        assert!(!remove_first(&mut contents, ProductId::new(9)));
        assert_eq!(contents, ids(&[1, 2]));
    }

    #[test]
    fn test_tally_preserves_first_seen_order() {
        assert_eq!(
            tally(&ids(&[3, 1, 3, 2, 1, 3])),
            vec![
                (ProductId::new(3), 3),
                (ProductId::new(1), 2),
                (ProductId::new(2), 1)
            ]
        );
        assert!(tally(&[]).is_empty());
    }
}
