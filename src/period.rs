//! Builds the fixed trailing windows the movement chart is plotted
//! over and buckets records into them.
//!
//! Each granularity covers a fixed number of periods ending at a caller
//! supplied reference date: seven days, six months, or five years. A
//! record lands in at most one period, matched at the granularity's
//! calendar precision, so bucket counts partition the in-range records.

use time::{Date, Duration, Month};

use crate::record::StockMovement;

/// How the movement chart groups records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// One period per day over the trailing week.
    #[default]
    Daily,
    /// One period per month over the trailing six months.
    Monthly,
    /// One period per year over the trailing five years.
    Yearly,
}

impl Granularity {
    /// The granularities in the order the selector presents them.
    pub fn default_preset() -> [Granularity; 3] {
        [
            Granularity::Daily,
            Granularity::Monthly,
            Granularity::Yearly,
        ]
    }

    /// The value used in query strings and on the command line.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }

    /// Parses the query string form produced by [Self::as_query_value].
    pub fn from_query_value(value: &str) -> Option<Granularity> {
        match value {
            "daily" => Some(Granularity::Daily),
            "monthly" => Some(Granularity::Monthly),
            "yearly" => Some(Granularity::Yearly),
            _ => None,
        }
    }

    /// The human readable label for the granularity.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Monthly => "Monthly",
            Granularity::Yearly => "Yearly",
        }
    }
}

// ============================================================================
// PERIODS
// ============================================================================

/// One bucket of the movement chart.
///
/// The calendar fields are filled to the granularity's precision: a
/// daily period has year, month, and day, a monthly period has year and
/// month, and a yearly period has only the year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Short axis label, for example `Mar 15`, `Mar 24`, or `2024`.
    pub label: String,
    /// Long form shown in tooltips, for example `Friday, March 15, 2024`.
    pub full_label: String,
    /// The period's calendar year.
    pub year: i32,
    /// The period's calendar month, when the granularity resolves months.
    pub month: Option<Month>,
    /// The period's day of month, when the granularity resolves days.
    pub day: Option<u8>,
}

impl Period {
    /// Reports whether `date` falls inside this period.
    pub fn contains(&self, date: Date) -> bool {
        self.year == date.year()
            && self.month.is_none_or(|month| month == date.month())
            && self.day.is_none_or(|day| day == date.day())
    }
}

/// Builds the trailing periods for `granularity` ending at `reference`
/// inclusive, oldest first.
pub fn build_periods(granularity: Granularity, reference: Date) -> Vec<Period> {
    match granularity {
        Granularity::Daily => (0..7)
            .rev()
            .filter_map(|days_back| reference.checked_sub(Duration::days(days_back)))
            .map(daily_period)
            .collect(),
        Granularity::Monthly => (0..6)
            .rev()
            .map(|months_back| {
                let (year, month) = shift_months_back(reference.year(), reference.month(), months_back);

                Period {
                    label: format!("{} {:02}", month_abbrev(month), year.rem_euclid(100)),
                    full_label: format!("{month} {year}"),
                    year,
                    month: Some(month),
                    day: None,
                }
            })
            .collect(),
        Granularity::Yearly => (0..5)
            .rev()
            .map(|years_back| {
                let year = reference.year() - years_back;

                Period {
                    label: year.to_string(),
                    full_label: year.to_string(),
                    year,
                    month: None,
                    day: None,
                }
            })
            .collect(),
    }
}

fn daily_period(date: Date) -> Period {
    Period {
        label: format!("{} {}", month_abbrev(date.month()), date.day()),
        full_label: format!(
            "{}, {} {}, {}",
            date.weekday(),
            date.month(),
            date.day(),
            date.year()
        ),
        year: date.year(),
        month: Some(date.month()),
        day: Some(date.day()),
    }
}

fn shift_months_back(year: i32, month: Month, months_back: i32) -> (i32, Month) {
    let mut year = year;
    let mut month = month;

    for _ in 0..months_back {
        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    (year, month)
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

// ============================================================================
// BUCKETING
// ============================================================================

/// One point of the movement chart series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    /// Short axis label carried over from the period.
    pub label: String,
    /// Long form carried over from the period.
    pub full_label: String,
    /// Units moved within the period.
    pub value: u64,
    /// How many records fell in the period.
    pub record_count: usize,
}

/// Buckets `movements` into `periods`, summing quantities per period.
///
/// Records without a parseable date and records outside every period
/// are left out entirely.
pub fn bucket_movements(movements: &[StockMovement], periods: &[Period]) -> Vec<SeriesPoint> {
    periods
        .iter()
        .map(|period| {
            let matching = movements
                .iter()
                .filter(|movement| movement.date.is_some_and(|date| period.contains(date)));

            let mut value = 0u64;
            let mut record_count = 0usize;

            for movement in matching {
                value += u64::from(movement.quantity);
                record_count += 1;
            }

            SeriesPoint {
                label: period.label.clone(),
                full_label: period.full_label.clone(),
                value,
                record_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod build_periods_tests {
    use time::macros::date;

    use super::{Granularity, build_periods};

    #[test]
    fn daily_covers_trailing_week_oldest_first() {
        let periods = build_periods(Granularity::Daily, date!(2024 - 03 - 15));

        assert_eq!(periods.len(), 7);
        assert_eq!(periods[0].label, "Mar 9");
        assert_eq!(periods[6].label, "Mar 15");
        assert_eq!(periods[6].full_label, "Friday, March 15, 2024");
    }

    #[test]
    fn daily_crosses_month_boundaries() {
        let periods = build_periods(Granularity::Daily, date!(2024 - 03 - 03));

        assert_eq!(periods[0].label, "Feb 26");
        assert_eq!(periods[6].label, "Mar 3");
    }

    #[test]
    fn monthly_covers_six_months_crossing_year_boundary() {
        let periods = build_periods(Granularity::Monthly, date!(2024 - 02 - 15));

        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0].label, "Sep 23");
        assert_eq!(periods[0].full_label, "September 2023");
        assert_eq!(periods[5].label, "Feb 24");
        assert_eq!(periods[5].full_label, "February 2024");
    }

    #[test]
    fn yearly_covers_five_years() {
        let periods = build_periods(Granularity::Yearly, date!(2024 - 06 - 01));

        assert_eq!(periods.len(), 5);
        assert_eq!(periods[0].label, "2020");
        assert_eq!(periods[4].label, "2024");
        assert_eq!(periods[4].full_label, "2024");
    }
}
