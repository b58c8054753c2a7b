//! Grouping of cart ingredient lines into per-ingredient totals.

use std::collections::HashMap;

use foodgram_core::{CartLine, IngredientLine, UserId};

use super::{CartSource, ShoppingListError};

/// Collect and total every ingredient in `user_id`'s shopping cart.
///
/// Lines are grouped by exact `(ingredient name, measurement unit)`; the
/// result keeps the order in which each group first appears.
///
/// # Errors
///
/// Returns `ShoppingListError::Storage` if the source fails, or
/// `ShoppingListError::InvalidState` for malformed lines (see [`group_lines`]).
pub async fn aggregate<S: CartSource>(
    source: &S,
    user_id: UserId,
) -> Result<Vec<CartLine>, ShoppingListError> {
    let lines = source.cart_ingredient_lines(user_id).await?;
    group_lines(lines)
}

/// Sum amounts per `(name, unit)` in first-seen order.
///
/// # Errors
///
/// Returns `ShoppingListError::InvalidState` if a line has a blank name or
/// unit, an amount below 1, or if a total overflows.
pub fn group_lines(
    lines: impl IntoIterator<Item = IngredientLine>,
) -> Result<Vec<CartLine>, ShoppingListError> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut totals: Vec<CartLine> = Vec::new();

    for line in lines {
        let amount = checked_amount(&line)?;
        let key = (line.ingredient_name, line.measurement_unit);

        if let Some(total) = positions.get(&key).and_then(|&index| totals.get_mut(index)) {
            let Some(sum) = total.amount.checked_add(amount) else {
                return Err(ShoppingListError::InvalidState(format!(
                    "total for {} ({}) overflows",
                    total.ingredient_name, total.measurement_unit
                )));
            };
            total.amount = sum;
        } else {
            positions.insert(key.clone(), totals.len());
            totals.push(CartLine::new(key.0, key.1, amount));
        }
    }

    Ok(totals)
}

fn checked_amount(line: &IngredientLine) -> Result<u64, ShoppingListError> {
    if line.ingredient_name.trim().is_empty() {
        return Err(ShoppingListError::InvalidState(
            "ingredient with blank name".to_owned(),
        ));
    }
    if line.measurement_unit.trim().is_empty() {
        return Err(ShoppingListError::InvalidState(format!(
            "ingredient {} has a blank measurement unit",
            line.ingredient_name
        )));
    }
    if line.amount < 1 {
        return Err(ShoppingListError::InvalidState(format!(
            "ingredient {} has amount {}",
            line.ingredient_name, line.amount
        )));
    }

    u64::try_from(line.amount).map_err(|e| ShoppingListError::InvalidState(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::RepositoryError;

    struct MemoryCart(Vec<IngredientLine>);

    impl CartSource for MemoryCart {
        async fn cart_ingredient_lines(
            &self,
            _user_id: UserId,
        ) -> Result<Vec<IngredientLine>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCart;

    impl CartSource for BrokenCart {
        async fn cart_ingredient_lines(
            &self,
            _user_id: UserId,
        ) -> Result<Vec<IngredientLine>, RepositoryError> {
            Err(RepositoryError::DataCorruption("cart row without recipe".to_owned()))
        }
    }

    fn fixture() -> Vec<IngredientLine> {
        vec![
            IngredientLine::new("Flour", "g", 200),
            IngredientLine::new("Egg", "pcs", 2),
            IngredientLine::new("Flour", "g", 100),
            IngredientLine::new("Milk", "ml", 250),
            IngredientLine::new("Flour", "kg", 1),
        ]
    }

    #[test]
    fn test_group_lines_sums_in_first_seen_order() {
        let totals = group_lines(fixture()).unwrap();
        assert_eq!(
            totals,
            vec![
                CartLine::new("Flour", "g", 300),
                CartLine::new("Egg", "pcs", 2),
                CartLine::new("Milk", "ml", 250),
                CartLine::new("Flour", "kg", 1),
            ]
        );
    }

    #[test]
    fn test_group_lines_totals_match_raw_sums() {
        let raw = fixture();
        let totals = group_lines(raw.clone()).unwrap();

        for total in &totals {
            let expected: u64 = raw
                .iter()
                .filter(|l| {
                    l.ingredient_name == total.ingredient_name
                        && l.measurement_unit == total.measurement_unit
                })
                .map(|l| u64::try_from(l.amount).unwrap())
                .sum();
            assert_eq!(total.amount, expected);
        }
    }

    #[test]
    fn test_group_lines_is_case_sensitive() {
        let totals = group_lines(vec![
            IngredientLine::new("sugar", "g", 10),
            IngredientLine::new("Sugar", "g", 5),
        ])
        .unwrap();
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_group_lines_rejects_malformed_lines() {
        for bad in [
            IngredientLine::new("  ", "g", 1),
            IngredientLine::new("Salt", "", 1),
            IngredientLine::new("Salt", "g", 0),
            IngredientLine::new("Salt", "g", -5),
        ] {
            let err = group_lines(vec![bad]).unwrap_err();
            assert!(matches!(err, ShoppingListError::InvalidState(_)));
        }
    }

    #[test]
    fn test_group_lines_empty() {
        assert!(group_lines(Vec::new()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_is_idempotent() {
        let cart = MemoryCart(fixture());
        let first = aggregate(&cart, UserId::new(1)).await.unwrap();
        let second = aggregate(&cart, UserId::new(1)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_aggregate_propagates_storage_errors() {
        let err = aggregate(&BrokenCart, UserId::new(1)).await.unwrap_err();
        assert!(matches!(err, ShoppingListError::Storage(_)));
    }
}
