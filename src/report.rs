//! The report surface: filtered summaries, chart series, rankings, and
//! the CSV export presets, composed from the pure building blocks so
//! one module can drive a whole reporting screen.

use std::path::{Path, PathBuf};

use time::Date;

use crate::aggregate::{self, PriceField, sum_amount, sum_quantity};
use crate::error::Error;
use crate::export::{
    Cell, PRODUCT_EXPORT_HEADERS, PRODUCT_EXPORT_STEM, STOCK_IN_EXPORT_HEADERS,
    STOCK_IN_EXPORT_STEM, STOCK_OUT_EXPORT_HEADERS, STOCK_OUT_EXPORT_STEM, products_csv_rows,
    stock_in_csv_rows, stock_out_csv_rows, write_csv_file,
};
use crate::filter::{DateWindow, filter_movements};
use crate::period::{Granularity, SeriesPoint, bucket_movements, build_periods};
use crate::record::{Part, StockMovement};

pub use crate::aggregate::top_n as compute_top_n;

// ============================================================================
// SUMMARY
// ============================================================================

/// The figures a reporting screen shows above its record table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    /// The records that passed the window and search filters, in their
    /// original order.
    pub filtered: Vec<StockMovement>,
    /// Units moved across the filtered records.
    pub total_quantity: u64,
    /// Value moved across the filtered records, using the report's
    /// price field.
    pub total_amount: f64,
    /// Profit across the filtered records. Present for issue reports
    /// only; receipts have no sale price to subtract from.
    pub total_profit: Option<f64>,
}

/// Filters `movements` by window and search term, then computes the
/// summary figures over what survived.
pub fn compute_summary(
    movements: &[StockMovement],
    window: DateWindow,
    search: &str,
    today: Date,
    price_field: PriceField,
) -> ReportSummary {
    let filtered = filter_movements(movements, window, search, today);
    let total_quantity = sum_quantity(&filtered);
    let total_amount = sum_amount(&filtered, price_field);
    let total_profit = match price_field {
        PriceField::Selling => Some(aggregate::total_profit(&filtered)),
        PriceField::Buying => None,
    };

    ReportSummary {
        filtered,
        total_quantity,
        total_amount,
        total_profit,
    }
}

// ============================================================================
// CHART SERIES
// ============================================================================

/// Buckets `movements` into the chart series for `granularity`.
///
/// `reference` anchors the period range, usually today's date in the
/// configured timezone.
pub fn compute_series(
    movements: &[StockMovement],
    granularity: Granularity,
    reference: Date,
) -> Vec<SeriesPoint> {
    let periods = build_periods(granularity, reference);

    bucket_movements(movements, &periods)
}

// ============================================================================
// CSV EXPORT
// ============================================================================

/// One exportable collection, bundling the records with their column
/// layout and file stem.
#[derive(Debug, Clone, Copy)]
pub enum CsvExport<'a> {
    /// The products listing, with a trailing `TOTAL` row.
    Products(&'a [Part]),
    /// The stock-in ledger.
    StockIn(&'a [StockMovement]),
    /// The stock-out ledger.
    StockOut(&'a [StockMovement]),
}

impl CsvExport<'_> {
    /// The file stem the dated export name is built from.
    pub fn stem(&self) -> &'static str {
        match self {
            CsvExport::Products(_) => PRODUCT_EXPORT_STEM,
            CsvExport::StockIn(_) => STOCK_IN_EXPORT_STEM,
            CsvExport::StockOut(_) => STOCK_OUT_EXPORT_STEM,
        }
    }

    fn headers(&self) -> &'static [&'static str] {
        match self {
            CsvExport::Products(_) => &PRODUCT_EXPORT_HEADERS,
            CsvExport::StockIn(_) => &STOCK_IN_EXPORT_HEADERS,
            CsvExport::StockOut(_) => &STOCK_OUT_EXPORT_HEADERS,
        }
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        match self {
            CsvExport::Products(parts) => products_csv_rows(parts),
            CsvExport::StockIn(movements) => stock_in_csv_rows(movements),
            CsvExport::StockOut(movements) => stock_out_csv_rows(movements),
        }
    }
}

/// Writes one export preset into `directory` under its dated file name
/// and returns the path written, or `None` when the collection was
/// empty and the export was skipped.
pub fn export_csv(
    export: CsvExport,
    directory: &Path,
    today: Date,
) -> Result<Option<PathBuf>, Error> {
    write_csv_file(directory, export.stem(), &export.rows(), export.headers(), today)
}

#[cfg(test)]
mod compute_summary_tests {
    use time::macros::date;

    use super::compute_summary;
    use crate::aggregate::PriceField;
    use crate::filter::DateWindow;
    use crate::record::Direction;
    use crate::record::test_utils::create_test_movement;

    const TODAY: time::Date = date!(2024 - 03 - 15);

    #[test]
    fn filters_before_summing() {
        let mut today_movement = create_test_movement("1", "Brake Pad", 10, Some(TODAY));
        today_movement.buying_price = Some(100.0);
        let mut old_movement =
            create_test_movement("2", "Oil Filter", 99, Some(date!(2023 - 01 - 01)));
        old_movement.buying_price = Some(100.0);
        let movements = vec![today_movement, old_movement];

        let got = compute_summary(&movements, DateWindow::Daily, "", TODAY, PriceField::Buying);

        assert_eq!(got.filtered.len(), 1);
        assert_eq!(got.total_quantity, 10);
        assert_eq!(got.total_amount, 1000.0);
    }

    #[test]
    fn search_narrows_the_summary() {
        let movements = vec![
            create_test_movement("1", "Brake Pad", 10, Some(TODAY)),
            create_test_movement("2", "Oil Filter", 5, Some(TODAY)),
        ];

        let got = compute_summary(&movements, DateWindow::All, "oil", TODAY, PriceField::Buying);

        assert_eq!(got.filtered.len(), 1);
        assert_eq!(got.total_quantity, 5);
    }

    #[test]
    fn issue_summary_includes_profit() {
        let mut movement = create_test_movement("1", "Brake Pad", 3, Some(TODAY));
        movement.direction = Direction::Out;
        movement.buying_price = Some(50.0);
        movement.selling_price = Some(80.0);

        let got = compute_summary(&[movement], DateWindow::All, "", TODAY, PriceField::Selling);

        assert_eq!(got.total_amount, 240.0);
        assert_eq!(got.total_profit, Some(90.0));
    }

    #[test]
    fn receipt_summary_has_no_profit() {
        let movement = create_test_movement("1", "Brake Pad", 3, Some(TODAY));

        let got = compute_summary(&[movement], DateWindow::All, "", TODAY, PriceField::Buying);

        assert_eq!(got.total_profit, None);
    }
}
