//! Date window presets and search filtering for movement lists.

use time::{Date, Duration};

use crate::record::StockMovement;

/// The date window presets offered on the movement list and report
/// screens.
///
/// Windows are evaluated against a caller supplied `today` so that list
/// rendering, report summaries, and exports all agree on what falls
/// inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    /// No date restriction.
    #[default]
    All,
    /// Records dated today.
    Daily,
    /// Records dated within the last seven days.
    Weekly,
    /// Records dated in the current calendar month.
    Monthly,
    /// Records dated in the current calendar year.
    Yearly,
}

impl DateWindow {
    /// The windows in the order the selector presents them.
    pub fn default_preset() -> [DateWindow; 5] {
        [
            DateWindow::All,
            DateWindow::Daily,
            DateWindow::Weekly,
            DateWindow::Monthly,
            DateWindow::Yearly,
        ]
    }

    /// The value used in query strings and on the command line.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            DateWindow::All => "all",
            DateWindow::Daily => "daily",
            DateWindow::Weekly => "weekly",
            DateWindow::Monthly => "monthly",
            DateWindow::Yearly => "yearly",
        }
    }

    /// Parses the query string form produced by [Self::as_query_value].
    pub fn from_query_value(value: &str) -> Option<DateWindow> {
        match value {
            "all" => Some(DateWindow::All),
            "daily" => Some(DateWindow::Daily),
            "weekly" => Some(DateWindow::Weekly),
            "monthly" => Some(DateWindow::Monthly),
            "yearly" => Some(DateWindow::Yearly),
            _ => None,
        }
    }

    /// The human readable label for the window.
    pub fn label(&self) -> &'static str {
        match self {
            DateWindow::All => "All Time",
            DateWindow::Daily => "Today",
            DateWindow::Weekly => "This Week",
            DateWindow::Monthly => "This Month",
            DateWindow::Yearly => "This Year",
        }
    }
}

/// Reports whether a record date falls inside `window` as of `today`.
///
/// Records without a parseable date only match [DateWindow::All]. The
/// weekly window has no upper bound, so future dated records count as
/// part of the current week.
pub fn matches_window(date: Option<Date>, window: DateWindow, today: Date) -> bool {
    if window == DateWindow::All {
        return true;
    }

    let Some(date) = date else {
        return false;
    };

    match window {
        DateWindow::All => true,
        DateWindow::Daily => date == today,
        DateWindow::Weekly => match today.checked_sub(Duration::days(7)) {
            Some(cutoff) => date >= cutoff,
            None => true,
        },
        DateWindow::Monthly => date.year() == today.year() && date.month() == today.month(),
        DateWindow::Yearly => date.year() == today.year(),
    }
}

/// Reports whether a movement matches a search term.
///
/// The term is matched case insensitively as a substring of the part
/// name, the part reference, and the record display id. A blank term
/// matches everything.
pub fn matches_search(movement: &StockMovement, search: &str) -> bool {
    let term = search.trim().to_lowercase();

    if term.is_empty() {
        return true;
    }

    movement.part_name.to_lowercase().contains(&term)
        || movement.part_ref.to_lowercase().contains(&term)
        || movement.display_id.to_lowercase().contains(&term)
}

/// Applies the date window and search term to a movement list, keeping
/// the original order.
pub fn filter_movements(
    movements: &[StockMovement],
    window: DateWindow,
    search: &str,
    today: Date,
) -> Vec<StockMovement> {
    movements
        .iter()
        .filter(|movement| matches_window(movement.date, window, today))
        .filter(|movement| matches_search(movement, search))
        .cloned()
        .collect()
}


#[cfg(test)]
mod matches_search_tests {
    use time::macros::date;

    use super::matches_search;
    use crate::record::test_utils::create_test_movement;

    #[test]
    fn blank_term_matches_everything() {
        let movement = create_test_movement("1", "Brake Pad", 4, Some(date!(2024 - 03 - 15)));

        assert!(matches_search(&movement, ""));
        assert!(matches_search(&movement, "   "));
    }

    #[test]
    fn term_is_case_insensitive_on_part_name() {
        let movement = create_test_movement("1", "Brake Pad", 4, Some(date!(2024 - 03 - 15)));

        assert!(matches_search(&movement, "brake"));
        assert!(matches_search(&movement, "PAD"));
        assert!(!matches_search(&movement, "filter"));
    }

    #[test]
    fn term_matches_ids() {
        let mut movement = create_test_movement("42", "Brake Pad", 4, Some(date!(2024 - 03 - 15)));
        movement.part_ref = "6507F1F77bcf86cd799439099".to_string();

        assert!(matches_search(&movement, "42"));
        assert!(matches_search(&movement, "6507f1f7"));
    }
}

#[cfg(test)]
mod filter_movements_tests {
    use time::macros::date;

    use super::{DateWindow, filter_movements};
    use crate::record::test_utils::create_test_movement;

    #[test]
    fn combines_window_and_search() {
        let movements = vec![
            create_test_movement("1", "Brake Pad", 4, Some(date!(2024 - 03 - 15))),
            create_test_movement("2", "Brake Pad", 2, Some(date!(2023 - 01 - 01))),
            create_test_movement("3", "Oil Filter", 9, Some(date!(2024 - 03 - 15))),
        ];

        let got = filter_movements(
            &movements,
            DateWindow::Yearly,
            "brake",
            date!(2024 - 03 - 15),
        );

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].display_id, "1");
    }

    #[test]
    fn keeps_input_order() {
        let movements = vec![
            create_test_movement("3", "Oil Filter", 9, Some(date!(2024 - 03 - 15))),
            create_test_movement("1", "Brake Pad", 4, Some(date!(2024 - 03 - 15))),
        ];

        let got = filter_movements(&movements, DateWindow::All, "", date!(2024 - 03 - 15));

        let ids: Vec<&str> = got.iter().map(|movement| movement.display_id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
