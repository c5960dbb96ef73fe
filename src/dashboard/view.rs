//! Standalone HTML document for the dashboard.
//!
//! The document carries everything it needs inline: counter cards, the
//! low stock table, and the two ECharts containers with their
//! initialization script. Only the ECharts runtime itself is loaded
//! from a CDN.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::OffsetDateTime;

use crate::period::{Granularity, bucket_movements, build_periods};
use crate::record::{Part, UNRESOLVED_NAME};

use super::charts::{DashboardChart, build_dashboard_charts};
use super::data::{DashboardData, LowStockSeverity};

const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

const DASHBOARD_STYLE: &str = r#"
    body {
        font-family: Arial, sans-serif;
        margin: 0 auto;
        max-width: 1100px;
        padding: 16px;
        color: #111827;
    }
    h1 {
        margin-bottom: 4px;
    }
    .tagline {
        color: #6b7280;
        margin-top: 0;
    }
    .counters {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
        gap: 16px;
        margin: 24px 0;
    }
    .counter {
        border: 1px solid #e5e7eb;
        border-radius: 8px;
        padding: 16px;
        box-shadow: 0 1px 2px rgba(0, 0, 0, 0.05);
    }
    .counter-value {
        font-size: 28px;
        font-weight: bold;
    }
    .counter-label {
        color: #6b7280;
    }
    .charts {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(400px, 1fr));
        gap: 16px;
        margin-bottom: 24px;
    }
    .chart {
        min-height: 380px;
        border: 1px solid #e5e7eb;
        border-radius: 8px;
    }
    table {
        width: 100%;
        border-collapse: collapse;
    }
    th, td {
        text-align: left;
        padding: 8px 12px;
        border-bottom: 1px solid #e5e7eb;
    }
    th {
        background-color: #f9fafb;
    }
    .product-name {
        font-weight: 500;
    }
    .product-id {
        font-size: 12px;
        color: #6b7280;
    }
    .badge {
        display: inline-block;
        padding: 2px 10px;
        border-radius: 9999px;
        font-size: 12px;
        font-weight: 500;
    }
    .badge.out-of-stock {
        background-color: #fee2e2;
        color: #991b1b;
    }
    .badge.critical {
        background-color: #ffedd5;
        color: #9a3412;
    }
    .badge.low-stock {
        background-color: #fef9c3;
        color: #854d0e;
    }
    .all-clear {
        border: 1px solid #e5e7eb;
        border-radius: 8px;
        padding: 24px;
        text-align: center;
    }
"#;

/// Renders the dashboard as a complete HTML document.
///
/// `now` fixes the reference date for the movement chart periods.
pub fn dashboard_document(
    data: &DashboardData,
    granularity: Granularity,
    now: OffsetDateTime,
) -> String {
    let periods = build_periods(granularity, now.date());
    let stock_in_series = bucket_movements(&data.stock_in, &periods);
    let stock_out_series = bucket_movements(&data.stock_out, &periods);
    let charts =
        build_dashboard_charts(&stock_in_series, &stock_out_series, &data.parts, granularity);

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Dashboard - Stocksight" }
                style { (PreEscaped(DASHBOARD_STYLE)) }
                script src=(ECHARTS_SCRIPT_URL) {}
                script { (charts_script(&charts)) }
            }

            body
            {
                h1 { "Dashboard" }
                p class="tagline" { "Monitor your inventory movements" }

                (counters_view(data))

                section class="charts"
                {
                    @for chart in &charts {
                        div id=(chart.id) class="chart" {}
                    }
                }

                (low_stock_view(&data.low_stock))
            }
        }
    }
    .into_string()
}

/// Generates JavaScript initialization code for the dashboard charts.
fn charts_script(charts: &[DashboardChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    ))
}

fn counters_view(data: &DashboardData) -> Markup {
    html! {
        section class="counters"
        {
            @for counter in data.counters() {
                div class="counter"
                {
                    div class="counter-value" { (counter.count) }
                    div class="counter-label" { (counter.label) }
                }
            }
        }
    }
}

fn low_stock_view(low_stock: &[Part]) -> Markup {
    if low_stock.is_empty() {
        return html! {
            section class="all-clear"
            {
                h2 { "All Stock Levels Good" }
                p { "No items are currently running low on stock." }
            }
        };
    }

    html! {
        section class="low-stock"
        {
            h2 { "Low Stock Alert" }
            p class="tagline" { "Items at or below their threshold require immediate attention" }

            table
            {
                thead
                {
                    tr
                    {
                        th { "Product Name" }
                        th { "Current Stock" }
                        th { "Category" }
                        th { "Manufacturer" }
                        th { "Status" }
                    }
                }

                tbody
                {
                    @for part in low_stock {
                        @let severity = LowStockSeverity::of(part);

                        tr
                        {
                            td
                            {
                                div class="product-name" { (part.name) }
                                div class="product-id" { "ID: " (part.display_id) }
                            }
                            td { (part.quantity) " units" }
                            td { (name_or_dash(&part.category)) }
                            td { (name_or_dash(&part.manufacturer)) }
                            td
                            {
                                span class={ "badge " (severity.css_class()) }
                                {
                                    (severity.label())
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The low stock table shows a dash for names the catalogue could not
/// resolve, unlike the parts report which spells out the sentinel.
fn name_or_dash(name: &str) -> &str {
    if name == UNRESOLVED_NAME { "-" } else { name }
}

#[cfg(test)]
mod dashboard_document_tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use super::dashboard_document;
    use crate::dashboard::data::DashboardData;
    use crate::period::Granularity;
    use crate::record::test_utils::{create_test_movement, create_test_part};
    use crate::record::{Part, UNRESOLVED_NAME};

    fn create_test_data() -> DashboardData {
        DashboardData {
            parts: vec![
                create_test_part("p1", "Brake Pad", 40, 5),
                create_test_part("p2", "Oil Filter", 2, 5),
            ],
            stock_in: vec![create_test_movement(
                "s1",
                "Brake Pad",
                25,
                Some(time::macros::date!(2024 - 03 - 15)),
            )],
            stock_out: vec![],
            low_stock: vec![create_test_part("p2", "Oil Filter", 2, 5)],
        }
    }

    fn render(data: &DashboardData) -> Html {
        let document =
            dashboard_document(data, Granularity::Daily, datetime!(2024-03-15 12:00 +2));

        Html::parse_document(&document)
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{chart_id}")).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{chart_id}' not found"
        );
    }

    #[test]
    fn renders_counter_cards_with_counts() {
        let html = render(&create_test_data());

        let selector = Selector::parse(".counter-value").unwrap();
        let got: Vec<String> = html
            .select(&selector)
            .map(|value| value.text().collect())
            .collect();

        assert_eq!(got, vec!["2", "1", "0", "1"]);
    }

    #[test]
    fn renders_both_chart_containers() {
        let html = render(&create_test_data());

        assert_chart_exists(&html, "movement-chart");
        assert_chart_exists(&html, "top-products-chart");
    }

    #[test]
    fn initializes_charts_on_load() {
        let document = dashboard_document(
            &create_test_data(),
            Granularity::Daily,
            datetime!(2024-03-15 12:00 +2),
        );

        assert!(document.contains("DOMContentLoaded"));
        assert!(document.contains("echarts.init"));
    }

    #[test]
    fn classifies_low_stock_rows() {
        let html = render(&create_test_data());

        let selector = Selector::parse(".badge.critical").unwrap();
        let badge: String = html.select(&selector).next().unwrap().text().collect();

        assert_eq!(badge, "Critical");
    }

    #[test]
    fn shows_a_dash_for_unresolved_names() {
        let data = DashboardData {
            low_stock: vec![Part {
                category: UNRESOLVED_NAME.to_string(),
                manufacturer: UNRESOLVED_NAME.to_string(),
                ..create_test_part("p1", "Brake Pad", 0, 5)
            }],
            ..create_test_data()
        };

        let html = render(&data);

        let selector = Selector::parse("tbody td").unwrap();
        let cells: Vec<String> = html
            .select(&selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        assert!(cells.contains(&"-".to_string()));
    }

    #[test]
    fn renders_all_clear_when_nothing_is_low() {
        let data = DashboardData {
            low_stock: vec![],
            ..create_test_data()
        };

        let html = render(&data);

        let selector = Selector::parse(".all-clear h2").unwrap();
        let heading: String = html.select(&selector).next().unwrap().text().collect();

        assert_eq!(heading, "All Stock Levels Good");
    }
}
