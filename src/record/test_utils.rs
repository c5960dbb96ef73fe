#![allow(missing_docs)]

use time::Date;

use crate::record::{Direction, Part, StockMovement};

pub(crate) fn create_test_part(id: &str, name: &str, quantity: u32, threshold: u32) -> Part {
    Part {
        id: id.to_owned(),
        display_id: id.to_owned(),
        name: name.to_owned(),
        category: "Brakes".to_owned(),
        manufacturer: "Acme Motors".to_owned(),
        quantity,
        buying_price: None,
        selling_price: None,
        low_stock_threshold: threshold,
    }
}

pub(crate) fn create_test_movement(
    id: &str,
    part_name: &str,
    quantity: u32,
    date: Option<Date>,
) -> StockMovement {
    StockMovement {
        id: id.to_owned(),
        display_id: id.to_owned(),
        part_ref: id.to_owned(),
        part_name: part_name.to_owned(),
        quantity,
        buying_price: None,
        selling_price: None,
        raw_date: date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "not-a-date".to_owned()),
        date,
        direction: Direction::In,
    }
}
