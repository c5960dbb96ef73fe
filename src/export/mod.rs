//! Turns normalized records into the two report surfaces: delimited
//! text files for spreadsheets and standalone HTML documents for
//! printing.

mod csv;
mod print;

pub use csv::{
    Cell, PRODUCT_EXPORT_HEADERS, PRODUCT_EXPORT_STEM, STOCK_IN_EXPORT_HEADERS,
    STOCK_IN_EXPORT_STEM, STOCK_OUT_EXPORT_HEADERS, STOCK_OUT_EXPORT_STEM, dated_filename,
    products_csv_rows, stock_in_csv_rows, stock_out_csv_rows, to_delimited_text, write_csv_file,
};
pub use print::{build_print_document, movement_table, parts_table};

/// Renders a date day first without padding, the style the report
/// surfaces have always used, for example `15/3/2024`.
pub(crate) fn format_day_first(date: time::Date) -> String {
    format!("{}/{}/{}", date.day(), u8::from(date.month()), date.year())
}
