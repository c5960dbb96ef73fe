//! Builds standalone HTML documents for the browser print dialog.
//!
//! The document carries its own stylesheet, duplicated inside a
//! `@media print` block so the preview window and the printed page
//! render identically, with an A4 page setup. Callers pass a clean
//! table fragment built by [movement_table] or [parts_table]; the
//! builder never inspects or rewrites the fragment.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::OffsetDateTime;

use crate::export::format_day_first;
use crate::format::format_currency;
use crate::record::{Part, StockMovement};

/// Table and banner styling, applied twice so print preview matches
/// paper output.
const PRINT_STYLE: &str = "
@media print {
    body {
        font-family: Arial, sans-serif;
        margin: 20px;
        font-size: 12px;
        line-height: 1.4;
    }
    table {
        width: 100%;
        border-collapse: collapse;
        margin-top: 20px;
    }
    th, td {
        border: 1px solid #333;
        padding: 6px 8px;
        text-align: left;
        vertical-align: top;
    }
    th {
        background-color: #f0f0f0;
        font-weight: bold;
        font-size: 11px;
        text-transform: uppercase;
    }
    td {
        font-size: 11px;
    }
    .print-header {
        text-align: center;
        margin-bottom: 20px;
        border-bottom: 2px solid #333;
        padding-bottom: 10px;
    }
    .print-date {
        text-align: right;
        font-size: 10px;
        margin-bottom: 10px;
    }
    tfoot td {
        font-weight: bold;
        background-color: #f5f5f5;
    }
    @page {
        margin: 1cm;
        size: A4;
    }
}
body {
    font-family: Arial, sans-serif;
    margin: 20px;
    font-size: 12px;
    line-height: 1.4;
}
table {
    width: 100%;
    border-collapse: collapse;
    margin-top: 20px;
}
th, td {
    border: 1px solid #333;
    padding: 6px 8px;
    text-align: left;
    vertical-align: top;
}
th {
    background-color: #f0f0f0;
    font-weight: bold;
    font-size: 11px;
    text-transform: uppercase;
}
td {
    font-size: 11px;
}
.print-header {
    text-align: center;
    margin-bottom: 20px;
    border-bottom: 2px solid #333;
    padding-bottom: 10px;
}
.print-date {
    text-align: right;
    font-size: 10px;
    margin-bottom: 10px;
}
tfoot td {
    font-weight: bold;
    background-color: #f5f5f5;
}
";

/// Wraps a table fragment in the full printable document.
///
/// The title carries the print date and the body opens with a
/// timestamp line and the report banner, so a stack of printed pages
/// stays attributable.
pub fn build_print_document(table: &Markup, now: OffsetDateTime) -> String {
    let date = format_day_first(now.date());
    let timestamp = format!(
        "{date}, {:02}:{:02}:{:02}",
        now.hour(),
        now.minute(),
        now.second()
    );

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { "Print Report - " (date) }
                style { (PreEscaped(PRINT_STYLE)) }
            }

            body
            {
                div class="print-date" { "Printed on: " (timestamp) }
                div class="print-header"
                {
                    h2 { "Stocksight Inventory Management" }
                    h3 { "Report" }
                }
                (table)
            }
        }
    }
    .into_string()
}

// ============================================================================
// TABLE FRAGMENTS
// ============================================================================

/// Builds the printable movement table with a `Global Total` footer.
///
/// The unit price column follows each movement's direction: cost for
/// receipts, sale price for issues.
pub fn movement_table(movements: &[StockMovement]) -> Markup {
    let total_quantity: u64 = movements
        .iter()
        .map(|movement| u64::from(movement.quantity))
        .sum();
    let total_amount: f64 = movements.iter().map(StockMovement::amount).sum();

    html! {
        table
        {
            thead
            {
                tr
                {
                    th { "Record ID" }
                    th { "Product Details" }
                    th { "Quantity" }
                    th { "Unit Price" }
                    th { "Total" }
                    th { "Date" }
                }
            }

            tbody
            {
                @for movement in movements
                {
                    tr
                    {
                        td { "#" (movement.display_id) }
                        td
                        {
                            div { (movement.part_name) }
                            div { "ID: " (movement.part_ref) }
                        }
                        td { (movement.quantity) }
                        td
                        {
                            @match movement.unit_price()
                            {
                                Some(price) => { (format_currency(price)) }
                                None => { "-" }
                            }
                        }
                        td { (format_currency(movement.amount())) }
                        td { (movement_date(movement)) }
                    }
                }
            }

            tfoot
            {
                tr
                {
                    td colspan="2" { "Global Total:" }
                    td { (total_quantity) " Units" }
                    td { "" }
                    td { (format_currency(total_amount)) }
                    td { "" }
                }
            }
        }
    }
}

/// Builds the printable parts table with an `Inventory Totals` footer.
pub fn parts_table(parts: &[Part]) -> Markup {
    let total_value: f64 = parts.iter().map(Part::total_buy_amount).sum();
    let total_revenue: f64 = parts.iter().map(Part::total_sell_amount).sum();

    html! {
        table
        {
            thead
            {
                tr
                {
                    th { "Product" }
                    th { "Category" }
                    th { "Manufacturer" }
                    th { "Stock" }
                    th { "Buy Price" }
                    th { "Sell Price" }
                    th { "Total Value" }
                }
            }

            tbody
            {
                @for part in parts
                {
                    tr
                    {
                        td
                        {
                            div { (part.name) }
                            div
                            {
                                "ID: " (part.display_id)
                                " | Threshold: " (part.low_stock_threshold)
                            }
                        }
                        td { (part.category) }
                        td { (part.manufacturer) }
                        td { (part.quantity) " units" }
                        td { (price_or_placeholder(part.buying_price)) }
                        td { (price_or_placeholder(part.selling_price)) }
                        td
                        {
                            div { "Buy: " (format_currency(part.total_buy_amount())) }
                            div { "Sell: " (format_currency(part.total_sell_amount())) }
                        }
                    }
                }
            }

            tfoot
            {
                tr
                {
                    td colspan="4" { "Inventory Totals:" }
                    td { "" }
                    td { "" }
                    td
                    {
                        div { "Buy: " (format_currency(total_value)) }
                        div { "Sell: " (format_currency(total_revenue)) }
                    }
                }
            }
        }
    }
}

fn movement_date(movement: &StockMovement) -> String {
    match movement.date {
        Some(date) => format_day_first(date),
        None => movement.raw_date.clone(),
    }
}

fn price_or_placeholder(price: Option<f64>) -> String {
    match price {
        Some(price) => format_currency(price),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod build_print_document_tests {
    use maud::html;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use super::build_print_document;

    #[test]
    fn document_carries_title_banner_and_timestamp() {
        let table = html! { table { tbody { tr { td { "x" } } } } };

        let document = build_print_document(&table, datetime!(2024-03-15 10:30:45 +2));

        let parsed = Html::parse_document(&document);
        let title = Selector::parse("title").unwrap();
        let banner = Selector::parse(".print-header h2").unwrap();
        let printed_on = Selector::parse(".print-date").unwrap();

        let title_text: String = parsed.select(&title).next().unwrap().text().collect();
        assert_eq!(title_text, "Print Report - 15/3/2024");

        let banner_text: String = parsed.select(&banner).next().unwrap().text().collect();
        assert_eq!(banner_text, "Stocksight Inventory Management");

        let printed_on_text: String = parsed.select(&printed_on).next().unwrap().text().collect();
        assert_eq!(printed_on_text, "Printed on: 15/3/2024, 10:30:45");
    }

    #[test]
    fn page_setup_targets_a4() {
        let table = html! { table {} };

        let document = build_print_document(&table, datetime!(2024-03-15 10:30:45 +2));

        assert!(document.contains("@media print"));
        assert!(document.contains("size: A4"));
    }
}
