//! The dashboard: counters, movement and top product charts, and the
//! low stock table, loaded in one pass from the inventory API and
//! rendered as a standalone HTML document.

mod charts;
mod data;
mod view;

pub use data::{Counter, DashboardData, LowStockSeverity};
pub use view::dashboard_document;
