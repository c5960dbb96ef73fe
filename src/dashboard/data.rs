//! Fetching and shaping the overview working set.

use time::UtcOffset;

use crate::api::ApiClient;
use crate::error::Error;
use crate::record::wire::{CategoryDto, ManufacturerDto, PartDto, StockInDto, StockOutDto};
use crate::record::{
    Part, StockMovement, normalize_part, normalize_stock_in, normalize_stock_out,
};

/// One stat card at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    /// The card title.
    pub label: &'static str,
    /// The number of records behind the card.
    pub count: usize,
}

/// How urgently a part on the low stock list needs restocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowStockSeverity {
    /// Nothing left on hand.
    OutOfStock,
    /// At or below the part's own threshold.
    Critical,
    /// Flagged by the server but still above the part's own threshold.
    LowStock,
}

impl LowStockSeverity {
    /// Classifies `part` the way the low stock table colours its rows.
    pub fn of(part: &Part) -> LowStockSeverity {
        if part.quantity == 0 {
            LowStockSeverity::OutOfStock
        } else if part.quantity <= part.low_stock_threshold {
            LowStockSeverity::Critical
        } else {
            LowStockSeverity::LowStock
        }
    }

    /// The status text shown in the table.
    pub fn label(&self) -> &'static str {
        match self {
            LowStockSeverity::OutOfStock => "Out of Stock",
            LowStockSeverity::Critical => "Critical",
            LowStockSeverity::LowStock => "Low Stock",
        }
    }

    /// The CSS class applied to the status badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            LowStockSeverity::OutOfStock => "out-of-stock",
            LowStockSeverity::Critical => "critical",
            LowStockSeverity::LowStock => "low-stock",
        }
    }
}

/// Everything the dashboard renders, fetched in one round and fully
/// normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    /// The full part catalogue.
    pub parts: Vec<Part>,
    /// All stock receipts.
    pub stock_in: Vec<StockMovement>,
    /// All stock issues.
    pub stock_out: Vec<StockMovement>,
    /// The parts the server flagged as running low.
    pub low_stock: Vec<Part>,
}

impl DashboardData {
    /// Fetches the six dashboard collections concurrently and
    /// normalizes them against each other.
    ///
    /// Any failed fetch fails the whole load; the dashboard never
    /// aggregates over partial data.
    pub async fn load(client: &ApiClient, offset: UtcOffset) -> Result<DashboardData, Error> {
        let (part_records, stock_in_records, stock_out_records, low_stock_records, categories, manufacturers) =
            tokio::try_join!(
                client.get_json::<Vec<PartDto>>("/spare_parts"),
                client.get_json::<Vec<StockInDto>>("/stock_in"),
                client.get_json::<Vec<StockOutDto>>("/stock_out"),
                client.get_json::<Vec<PartDto>>("/low_stock"),
                client.get_json::<Vec<CategoryDto>>("/categories"),
                client.get_json::<Vec<ManufacturerDto>>("/manufacturers"),
            )?;

        let parts: Vec<Part> = part_records
            .iter()
            .map(|record| normalize_part(record, &categories, &manufacturers))
            .collect();

        Ok(DashboardData {
            stock_in: stock_in_records
                .iter()
                .map(|record| normalize_stock_in(record, &parts, offset))
                .collect(),
            stock_out: stock_out_records
                .iter()
                .map(|record| normalize_stock_out(record, &parts, offset))
                .collect(),
            low_stock: low_stock_records
                .iter()
                .map(|record| normalize_part(record, &categories, &manufacturers))
                .collect(),
            parts,
        })
    }

    /// The four stat cards shown at the top of the dashboard.
    pub fn counters(&self) -> [Counter; 4] {
        [
            Counter {
                label: "Total Products",
                count: self.parts.len(),
            },
            Counter {
                label: "Stock In Records",
                count: self.stock_in.len(),
            },
            Counter {
                label: "Stock Out Records",
                count: self.stock_out.len(),
            },
            Counter {
                label: "Low Stock Alerts",
                count: self.low_stock.len(),
            },
        ]
    }
}

#[cfg(test)]
mod severity_tests {
    use super::LowStockSeverity;
    use crate::record::test_utils::create_test_part;

    #[test]
    fn zero_quantity_is_out_of_stock() {
        let part = create_test_part("p1", "Brake Pad", 0, 5);

        assert_eq!(LowStockSeverity::of(&part), LowStockSeverity::OutOfStock);
    }

    #[test]
    fn at_or_below_threshold_is_critical() {
        let at_threshold = create_test_part("p1", "Brake Pad", 5, 5);
        let below_threshold = create_test_part("p2", "Oil Filter", 3, 5);

        assert_eq!(
            LowStockSeverity::of(&at_threshold),
            LowStockSeverity::Critical
        );
        assert_eq!(
            LowStockSeverity::of(&below_threshold),
            LowStockSeverity::Critical
        );
    }

    #[test]
    fn flagged_but_above_threshold_is_low_stock() {
        // The server applies its own margin, so the list can contain
        // parts that sit above their configured threshold.
        let part = create_test_part("p1", "Brake Pad", 7, 5);

        assert_eq!(LowStockSeverity::of(&part), LowStockSeverity::LowStock);
    }
}

#[cfg(test)]
mod counter_tests {
    use super::DashboardData;
    use crate::record::test_utils::{create_test_movement, create_test_part};

    #[test]
    fn counters_reflect_collection_sizes() {
        let data = DashboardData {
            parts: vec![
                create_test_part("p1", "Brake Pad", 10, 5),
                create_test_part("p2", "Oil Filter", 2, 5),
            ],
            stock_in: vec![create_test_movement("s1", "Brake Pad", 5, None)],
            stock_out: vec![],
            low_stock: vec![create_test_part("p2", "Oil Filter", 2, 5)],
        };

        let counters = data.counters();

        let got: Vec<(&str, usize)> = counters
            .iter()
            .map(|counter| (counter.label, counter.count))
            .collect();
        let want = vec![
            ("Total Products", 2),
            ("Stock In Records", 1),
            ("Stock Out Records", 0),
            ("Low Stock Alerts", 1),
        ];
        assert_eq!(got, want);
    }
}
