//! Shopping list line types.
//!
//! [`IngredientLine`] is one recipe ingredient reachable from a user's
//! shopping cart, exactly as stored. [`CartLine`] is the grouped total for a
//! single `(ingredient name, measurement unit)` pair. Neither is persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One ingredient row of one recipe in a user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct IngredientLine {
    pub ingredient_name: String,
    pub measurement_unit: String,
    /// Quantity as stored. Expected to be at least 1.
    pub amount: i32,
}

impl IngredientLine {
    pub fn new(
        ingredient_name: impl Into<String>,
        measurement_unit: impl Into<String>,
        amount: i32,
    ) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Total quantity of one ingredient in one unit across a shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLine {
    pub ingredient_name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

impl CartLine {
    pub fn new(
        ingredient_name: impl Into<String>,
        measurement_unit: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self {
            ingredient_name: ingredient_name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Formats as `"{name} - {amount} {unit}"`, without numbering.
impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {}",
            self.ingredient_name, self.amount, self.measurement_unit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_display() {
        let line = CartLine::new("Flour", "g", 300);
        assert_eq!(line.to_string(), "Flour - 300 g");
    }
}
