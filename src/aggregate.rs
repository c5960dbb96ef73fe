//! Pure reductions over record collections: totals, profit, stock level
//! counts, and top-N ranking.
//!
//! Every function here takes an immutable snapshot and returns a fresh
//! value, so callers can recompute on every input change without
//! worrying about shared state.

use crate::record::{Part, StockMovement, StockStatus};

// ============================================================================
// MOVEMENT TOTALS
// ============================================================================

/// Selects which unit price a monetary total is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    /// The unit cost recorded at receipt time.
    Buying,
    /// The unit price recorded at issue time.
    Selling,
}

impl PriceField {
    fn of(&self, movement: &StockMovement) -> Option<f64> {
        match self {
            PriceField::Buying => movement.buying_price,
            PriceField::Selling => movement.selling_price,
        }
    }
}

/// Sums the units moved across `movements`.
pub fn sum_quantity(movements: &[StockMovement]) -> u64 {
    movements
        .iter()
        .map(|movement| u64::from(movement.quantity))
        .sum()
}

/// Sums `quantity * price` across `movements` using the selected price
/// field. A record without that price contributes zero rather than
/// poisoning the total.
pub fn sum_amount(movements: &[StockMovement], price_field: PriceField) -> f64 {
    movements
        .iter()
        .map(|movement| {
            f64::from(movement.quantity) * price_field.of(movement).unwrap_or(0.0)
        })
        .sum()
}

/// Sums `(selling - buying) * quantity` across `movements`, with each
/// missing price treated as zero. The result can be negative when goods
/// were issued below cost.
pub fn total_profit(movements: &[StockMovement]) -> f64 {
    movements
        .iter()
        .map(|movement| {
            let selling = movement.selling_price.unwrap_or(0.0);
            let buying = movement.buying_price.unwrap_or(0.0);

            (selling - buying) * f64::from(movement.quantity)
        })
        .sum()
}

// ============================================================================
// PART TOTALS
// ============================================================================

/// Sums the purchase value of everything on hand.
pub fn inventory_value(parts: &[Part]) -> f64 {
    parts.iter().map(Part::total_buy_amount).sum()
}

/// Sums the sale value of everything on hand.
pub fn potential_revenue(parts: &[Part]) -> f64 {
    parts.iter().map(Part::total_sell_amount).sum()
}

/// Sums the margin on everything on hand.
pub fn potential_profit(parts: &[Part]) -> f64 {
    parts.iter().map(Part::potential_profit).sum()
}

/// How many parts fall into each stock level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockLevelCounts {
    /// Parts above their reorder threshold.
    pub in_stock: usize,
    /// Parts at or below their reorder threshold but not exhausted.
    pub low_stock: usize,
    /// Parts with nothing on hand.
    pub out_of_stock: usize,
}

/// Tallies parts by their [StockStatus] band.
pub fn stock_level_counts(parts: &[Part]) -> StockLevelCounts {
    let mut counts = StockLevelCounts::default();

    for part in parts {
        match part.stock_status() {
            StockStatus::InStock => counts.in_stock += 1,
            StockStatus::LowStock => counts.low_stock += 1,
            StockStatus::OutOfStock => counts.out_of_stock += 1,
        }
    }

    counts
}

// ============================================================================
// TOP-N RANKING
// ============================================================================

/// Selects the numeric field parts are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    /// Units on hand.
    Quantity,
    /// Purchase value of the units on hand.
    StockValue,
}

impl RankField {
    fn of(&self, part: &Part) -> f64 {
        match self {
            RankField::Quantity => f64::from(part.quantity),
            RankField::StockValue => part.total_buy_amount(),
        }
    }
}

/// One entry of a top-N ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPart {
    /// The part name.
    pub name: String,
    /// The raw value of the ranked field.
    pub value: f64,
    /// The value relative to the largest value across the whole input,
    /// in the range 0 to 100.
    pub percentage: f64,
}

/// Ranks `parts` descending by `field` and keeps the first `n`.
///
/// Ties keep their input order. Percentages are computed against the
/// maximum across the FULL input, not just the kept entries, so a
/// truncated ranking still shows how entries compare to the whole
/// collection. When the maximum is zero every percentage is zero.
pub fn top_n(parts: &[Part], field: RankField, n: usize) -> Vec<RankedPart> {
    let max = parts
        .iter()
        .map(|part| field.of(part))
        .fold(0.0_f64, f64::max);

    let mut ranked: Vec<(&Part, f64)> = parts
        .iter()
        .map(|part| (part, field.of(part)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    ranked.truncate(n);

    ranked
        .into_iter()
        .map(|(part, value)| RankedPart {
            name: part.name.clone(),
            value,
            percentage: if max > 0.0 {
                (value / max * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod movement_total_tests {
    use super::{PriceField, sum_amount, sum_quantity, total_profit};
    use crate::record::test_utils::create_test_movement;

    #[test]
    fn sums_receipt_value() {
        let mut first = create_test_movement("1", "Brake Pad", 10, None);
        first.buying_price = Some(100.0);
        let mut second = create_test_movement("2", "Oil Filter", 5, None);
        second.buying_price = Some(200.0);
        let movements = vec![first, second];

        let got = sum_amount(&movements, PriceField::Buying);

        assert_eq!(got, 2000.0);
    }

    #[test]
    fn missing_price_contributes_zero() {
        let movements = vec![create_test_movement("1", "Brake Pad", 10, None)];

        let got = sum_amount(&movements, PriceField::Buying);

        assert_eq!(got, 0.0);
        assert!(!got.is_nan());
    }

    #[test]
    fn sums_quantities() {
        let movements = vec![
            create_test_movement("1", "Brake Pad", 20, None),
            create_test_movement("2", "Oil Filter", 5, None),
        ];

        assert_eq!(sum_quantity(&movements), 25);
    }

    #[test]
    fn profit_subtracts_cost_from_revenue() {
        let mut movement = create_test_movement("1", "Brake Pad", 3, None);
        movement.buying_price = Some(50.0);
        movement.selling_price = Some(80.0);

        let got = total_profit(&[movement]);

        assert_eq!(got, 90.0);
    }

    #[test]
    fn profit_can_be_negative() {
        let mut movement = create_test_movement("1", "Brake Pad", 2, None);
        movement.buying_price = Some(100.0);
        movement.selling_price = Some(60.0);

        let got = total_profit(&[movement]);

        assert_eq!(got, -80.0);
    }

    #[test]
    fn profit_treats_missing_prices_as_zero() {
        let movement = create_test_movement("1", "Brake Pad", 3, None);

        let got = total_profit(&[movement]);

        assert_eq!(got, 0.0);
        assert!(!got.is_nan());
    }
}
