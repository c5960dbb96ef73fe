//! Delimited text export in the dialect the office spreadsheets expect:
//! UTF-8 BOM, semicolon delimiter, CRLF row endings.
//!
//! Values pass through a fixed per-type pipeline before joining, so a
//! part name containing markup, stray whitespace, or a literal `;` can
//! never break column alignment. The preset row builders reproduce the
//! column layouts the reporting screens have always exported.

use std::fs;
use std::path::{Path, PathBuf};

use time::Date;
use tracing::warn;

use crate::error::Error;
use crate::export::format_day_first;
use crate::record::{Part, StockMovement};

/// Byte order mark so spreadsheet imports pick up UTF-8.
const BOM: char = '\u{FEFF}';

/// Column headers of the products export.
pub const PRODUCT_EXPORT_HEADERS: [&str; 10] = [
    "Part_ID",
    "Product_Name",
    "Category",
    "Manufacturer",
    "Quantity",
    "Buying_Price_RWF",
    "Selling_Price_RWF",
    "Total_Buy_Amount_RWF",
    "Total_Sell_Amount_RWF",
    "Potential_Profit_RWF",
];

/// Column headers of the stock-in export.
pub const STOCK_IN_EXPORT_HEADERS: [&str; 7] = [
    "Stock_In_ID",
    "Part_ID",
    "Product_Name",
    "Quantity",
    "Buying_Price_RWF",
    "Total_Cost_RWF",
    "Date",
];

/// Column headers of the stock-out export.
pub const STOCK_OUT_EXPORT_HEADERS: [&str; 7] = [
    "Stock_Out_ID",
    "Part_ID",
    "Product_Name",
    "Quantity",
    "Selling_Price_RWF",
    "Total_Revenue_RWF",
    "Date",
];

/// Default file stem of the products export.
pub const PRODUCT_EXPORT_STEM: &str = "products";

/// Default file stem of the stock-in export.
pub const STOCK_IN_EXPORT_STEM: &str = "stock_in_records";

/// Default file stem of the stock-out export.
pub const STOCK_OUT_EXPORT_STEM: &str = "stock_out_records";

// ============================================================================
// CELLS
// ============================================================================

/// One value of an export row, typed so each kind gets the right
/// serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// An absent value, serialized as an empty field.
    Null,
    /// A number, serialized without thousands separators so spreadsheet
    /// formulas keep working.
    Number(f64),
    /// A calendar date, serialized as `D/M/YYYY`.
    Date(Date),
    /// Structured data, serialized as compact JSON.
    Json(serde_json::Value),
    /// Free text, cleaned up before joining.
    Text(String),
}

impl Cell {
    /// Serializes the cell into its delimited text field.
    ///
    /// Text fields are stripped of HTML tags, whitespace runs collapse
    /// to a single space, literal `;` becomes `,` so the delimiter
    /// stays unambiguous, and the result is trimmed.
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(number) => number.to_string(),
            Cell::Date(date) => format_day_first(*date),
            Cell::Json(value) => serde_json::to_string(value).unwrap_or_default(),
            Cell::Text(text) => sanitize_text(text),
        }
    }
}

fn sanitize_text(value: &str) -> String {
    let stripped = strip_tags(value);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed.replace(';', ",")
}

/// Removes `<...>` spans. A `<` without a closing `>` is kept verbatim.
fn strip_tags(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find('<') {
        output.push_str(&rest[..open]);

        match rest[open + 1..].find('>') {
            Some(close) => rest = &rest[open + 1 + close + 1..],
            None => {
                output.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

// ============================================================================
// DOCUMENT ASSEMBLY
// ============================================================================

/// Joins rows into the full delimited text document.
///
/// The output starts with a byte order mark, then the header line, then
/// one line per row. Every line including the last is terminated with
/// CRLF.
pub fn to_delimited_text(rows: &[Vec<Cell>], headers: &[&str]) -> String {
    let mut content = String::new();
    content.push(BOM);

    content.push_str(&headers.join(";"));
    content.push_str("\r\n");

    for row in rows {
        let fields: Vec<String> = row.iter().map(Cell::to_csv_field).collect();
        content.push_str(&fields.join(";"));
        content.push_str("\r\n");
    }

    content
}

/// Builds the dated export file name, for example `products_2024-03-15.csv`.
pub fn dated_filename(stem: &str, today: Date) -> String {
    format!(
        "{stem}_{:04}-{:02}-{:02}.csv",
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

/// Writes a delimited text export into `directory` under a dated file
/// name and returns the path written.
///
/// An empty row set logs a warning and writes nothing, mirroring how
/// the reporting screens treat an export with no data as a no-op
/// rather than producing an empty file.
pub fn write_csv_file(
    directory: &Path,
    stem: &str,
    rows: &[Vec<Cell>],
    headers: &[&str],
    today: Date,
) -> Result<Option<PathBuf>, Error> {
    if rows.is_empty() {
        warn!("skipping {stem} export, no rows to write");

        return Ok(None);
    }

    let path = directory.join(dated_filename(stem, today));
    let content = to_delimited_text(rows, headers);

    fs::write(&path, content)
        .map_err(|error| Error::ExportIo(path.display().to_string(), error.to_string()))?;

    Ok(Some(path))
}

// ============================================================================
// PRESET ROW BUILDERS
// ============================================================================

/// Builds the products export rows, one per part plus a trailing
/// `TOTAL` row summing the quantity and amount columns.
pub fn products_csv_rows(parts: &[Part]) -> Vec<Vec<Cell>> {
    let mut rows: Vec<Vec<Cell>> = parts
        .iter()
        .map(|part| {
            vec![
                Cell::Text(part.display_id.clone()),
                Cell::Text(part.name.clone()),
                Cell::Text(part.category.clone()),
                Cell::Text(part.manufacturer.clone()),
                Cell::Number(f64::from(part.quantity)),
                Cell::Number(part.buying_price.unwrap_or(0.0)),
                Cell::Number(part.selling_price.unwrap_or(0.0)),
                Cell::Number(part.total_buy_amount()),
                Cell::Number(part.total_sell_amount()),
                Cell::Number(part.potential_profit()),
            ]
        })
        .collect();

    let total_quantity: f64 = parts.iter().map(|part| f64::from(part.quantity)).sum();
    let total_buy: f64 = parts.iter().map(Part::total_buy_amount).sum();
    let total_sell: f64 = parts.iter().map(Part::total_sell_amount).sum();
    let total_profit: f64 = parts.iter().map(Part::potential_profit).sum();

    rows.push(vec![
        Cell::Null,
        Cell::Text("TOTAL".to_string()),
        Cell::Null,
        Cell::Null,
        Cell::Number(total_quantity),
        Cell::Null,
        Cell::Null,
        Cell::Number(total_buy),
        Cell::Number(total_sell),
        Cell::Number(total_profit),
    ]);

    rows
}

/// Builds the stock-in export rows.
pub fn stock_in_csv_rows(movements: &[StockMovement]) -> Vec<Vec<Cell>> {
    movements
        .iter()
        .map(|movement| {
            let unit_cost = movement.buying_price.unwrap_or(0.0);

            vec![
                Cell::Text(movement.display_id.clone()),
                Cell::Text(movement.part_ref.clone()),
                Cell::Text(movement.part_name.clone()),
                Cell::Number(f64::from(movement.quantity)),
                Cell::Number(unit_cost),
                Cell::Number(f64::from(movement.quantity) * unit_cost),
                date_cell(movement),
            ]
        })
        .collect()
}

/// Builds the stock-out export rows.
pub fn stock_out_csv_rows(movements: &[StockMovement]) -> Vec<Vec<Cell>> {
    movements
        .iter()
        .map(|movement| {
            let unit_price = movement.selling_price.unwrap_or(0.0);

            vec![
                Cell::Text(movement.display_id.clone()),
                Cell::Text(movement.part_ref.clone()),
                Cell::Text(movement.part_name.clone()),
                Cell::Number(f64::from(movement.quantity)),
                Cell::Number(unit_price),
                Cell::Number(f64::from(movement.quantity) * unit_price),
                date_cell(movement),
            ]
        })
        .collect()
}

/// Picks the date cell for a movement row. Records that arrived with an
/// unparseable date keep the raw value so the bad data stays visible in
/// the export.
fn date_cell(movement: &StockMovement) -> Cell {
    match movement.date {
        Some(date) => Cell::Date(date),
        None if movement.raw_date.is_empty() => Cell::Null,
        None => Cell::Text(movement.raw_date.clone()),
    }
}

#[cfg(test)]
mod cell_tests {
    use time::macros::date;

    use super::Cell;

    #[test]
    fn whole_numbers_have_no_decimal_point() {
        assert_eq!(Cell::Number(5.0).to_csv_field(), "5");
        assert_eq!(Cell::Number(12.5).to_csv_field(), "12.5");
    }

    #[test]
    fn dates_render_day_first() {
        let got = Cell::Date(date!(2024 - 03 - 15)).to_csv_field();

        assert_eq!(got, "15/3/2024");
    }

    #[test]
    fn json_renders_verbatim() {
        let got = Cell::Json(serde_json::json!({"level": "critical"})).to_csv_field();

        assert_eq!(got, r#"{"level":"critical"}"#);
    }

    #[test]
    fn text_is_stripped_collapsed_and_trimmed() {
        let got = Cell::Text("  <b>Brake</b>\t Pad \n ".to_string()).to_csv_field();

        assert_eq!(got, "Brake Pad");
    }

    #[test]
    fn unclosed_tag_is_kept() {
        let got = Cell::Text("Brake <oops".to_string()).to_csv_field();

        assert_eq!(got, "Brake <oops");
    }

    #[test]
    fn delimiter_collisions_become_commas() {
        let got = Cell::Text("x;y".to_string()).to_csv_field();

        assert_eq!(got, "x,y");
    }
}



#[cfg(test)]
mod write_csv_file_tests {
    use std::fs;

    use time::macros::date;

    use super::{Cell, dated_filename, write_csv_file};

    #[test]
    fn filename_embeds_the_date() {
        assert_eq!(
            dated_filename("products", date!(2024 - 03 - 15)),
            "products_2024-03-15.csv"
        );
    }

    #[test]
    fn empty_rows_write_nothing() {
        let written = write_csv_file(
            &std::env::temp_dir(),
            "empty_export_case",
            &[],
            &["a"],
            date!(2024 - 03 - 15),
        )
        .unwrap();

        assert!(written.is_none());
    }

    #[test]
    fn writes_dated_file() {
        let directory = std::env::temp_dir();
        let rows = vec![vec![Cell::Number(1.0)]];

        let written = write_csv_file(&directory, "write_csv_case", &rows, &["a"], date!(2024 - 03 - 15))
            .unwrap()
            .unwrap();

        let content = fs::read_to_string(&written).unwrap();
        assert_eq!(content, "\u{FEFF}a\r\n1\r\n");
        assert!(written.ends_with("write_csv_case_2024-03-15.csv"));

        fs::remove_file(written).unwrap();
    }
}
