//! Stocksight is the reporting core of a spare parts inventory system.
//!
//! This library fetches JSON collections from the inventory REST API,
//! normalizes their heterogeneous record shapes, and computes the
//! summaries, chart series, exports, and dashboard documents the
//! reporting screens are built from.

#![warn(missing_docs)]

use tokio::signal;

mod aggregate;
mod alert;
mod api;
mod config;
mod dashboard;
mod error;
mod export;
mod filter;
mod format;
mod period;
mod poll;
mod record;
mod report;
mod session;
mod timezone;

pub use aggregate::{
    PriceField, RankField, RankedPart, StockLevelCounts, inventory_value, potential_profit,
    potential_revenue, stock_level_counts, sum_amount, sum_quantity, top_n, total_profit,
};
pub use alert::{Alert, AlertLevel, CheckOutcome};
pub use api::{ApiClient, Catalogue};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEZONE,
};
pub use dashboard::{Counter, DashboardData, LowStockSeverity, dashboard_document};
pub use error::Error;
pub use export::{
    Cell, PRODUCT_EXPORT_HEADERS, PRODUCT_EXPORT_STEM, STOCK_IN_EXPORT_HEADERS,
    STOCK_IN_EXPORT_STEM, STOCK_OUT_EXPORT_HEADERS, STOCK_OUT_EXPORT_STEM, build_print_document,
    dated_filename, movement_table, parts_table, products_csv_rows, stock_in_csv_rows,
    stock_out_csv_rows, to_delimited_text, write_csv_file,
};
pub use filter::{DateWindow, filter_movements, matches_search, matches_window};
pub use format::format_currency;
pub use period::{Granularity, Period, SeriesPoint, bucket_movements, build_periods};
pub use poll::{AlertPoller, AlertSource};
pub use record::{
    Category, Direction, Manufacturer, Part, StockMovement, StockStatus, UNRESOLVED_NAME,
};
pub use report::{
    CsvExport, ReportSummary, compute_series, compute_summary, compute_top_n, export_csv,
};
pub use session::{Session, SessionContext, SessionUser};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first.
///
/// Long running commands race this against their work loop to exit
/// cleanly.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }
}
