//! The canonical inventory records and the code that produces them
//! from raw API payloads.

mod models;
mod normalize;
pub(crate) mod wire;

#[cfg(test)]
pub(crate) mod test_utils;

pub use models::{
    Category, Direction, Manufacturer, Part, StockMovement, StockStatus, UNRESOLVED_NAME,
};
pub(crate) use normalize::{
    normalize_category, normalize_manufacturer, normalize_part, normalize_stock_in,
    normalize_stock_out,
};
