//! ECharts definitions for the two dashboard charts.
//!
//! - **Stock Movement Trends**: stock-in vs. stock-out quantity per
//!   period at the selected granularity.
//! - **Top Products by Stock**: the five largest holdings ranked by
//!   units on hand.
//!
//! Each chart is generated as JSON configuration for the ECharts library
//! and paired with the ID of the HTML container it renders into.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction, Tooltip,
        Trigger,
    },
    series::{Bar, Line},
};

use crate::aggregate::{RankField, top_n};
use crate::period::{Granularity, SeriesPoint};
use crate::record::Part;

/// How many parts the ranking chart shows.
const TOP_PRODUCT_COUNT: usize = 5;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case).
    pub id: &'static str,
    /// The ECharts configuration as a JSON string.
    pub options: String,
}

/// Creates the pair of dashboard charts from the bucketed movement
/// series and the part catalogue.
pub(super) fn build_dashboard_charts(
    stock_in: &[SeriesPoint],
    stock_out: &[SeriesPoint],
    parts: &[Part],
    granularity: Granularity,
) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "movement-chart",
            options: movement_chart(stock_in, stock_out, granularity).to_string(),
        },
        DashboardChart {
            id: "top-products-chart",
            options: top_products_chart(parts).to_string(),
        },
    ]
}

pub(super) fn movement_chart(
    stock_in: &[SeriesPoint],
    stock_out: &[SeriesPoint],
    granularity: Granularity,
) -> Chart {
    let labels: Vec<String> = stock_in.iter().map(|point| point.label.clone()).collect();
    let stock_in_values: Vec<f64> = stock_in.iter().map(|point| point.value as f64).collect();
    let stock_out_values: Vec<f64> = stock_out.iter().map(|point| point.value as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Stock Movement Trends")
                .subtext(format!("{} View", granularity.label())),
        )
        .tooltip(units_tooltip())
        .legend(Legend::new().top("8%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Stock In").data(stock_in_values))
        .series(Line::new().name("Stock Out").data(stock_out_values))
}

pub(super) fn top_products_chart(parts: &[Part]) -> Chart {
    let ranked = top_n(parts, RankField::Quantity, TOP_PRODUCT_COUNT);

    // Category axes plot bottom up, so reverse to put rank one on top.
    let names: Vec<String> = ranked.iter().rev().map(|part| part.name.clone()).collect();
    let values: Vec<f64> = ranked.iter().rev().map(|part| part.value).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Top Products by Stock")
                .subtext("Ranked by units on hand"),
        )
        .tooltip(units_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Value))
        .y_axis(Axis::new().type_(AxisType::Category).data(names))
        .series(
            Bar::new()
                .name("Units in Stock")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(values),
        )
}

/// Creates a tooltip configuration that appends the unit to quantities.
fn units_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(units_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[inline]
fn units_formatter() -> JsFunction {
    JsFunction::new_with_args("number", "return number + \" units\";")
}
