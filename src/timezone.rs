//! Resolves canonical timezone names to concrete UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Looks up the UTC offset that the canonical timezone (e.g. "Africa/Kigali")
/// is at for the given moment.
///
/// Returns `None` when the name is not in the bundled timezone database.
pub fn local_offset_at(canonical_timezone: &str, moment: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&moment).to_utc())
}
