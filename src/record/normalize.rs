//! Collapses raw API payloads into the canonical record types.
//!
//! Records served by the inventory API mix two generations: legacy rows
//! with integer sequence ids and newer rows with opaque document ids.
//! Normalization picks one canonical id, derives the short display id,
//! resolves part, category, and manufacturer names against the lookup
//! collections, and parses dates into calendar dates in the configured
//! timezone. Records that fail these steps are kept with placeholder
//! values rather than dropped, so totals still include them.

use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::record::{
    Category, Direction, Manufacturer, Part, StockMovement, UNRESOLVED_NAME,
    wire::{
        CategoryDto, IdValue, ManufacturerDto, PartDto, StockInDto, StockOutDto, optional_f64,
        optional_quantity,
    },
};

/// Threshold applied when a part does not carry one, matching the
/// server default.
const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// How many characters of an opaque id make up the short display form.
const DISPLAY_ID_LENGTH: usize = 8;

const DATE_ONLY: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

// ============================================================================
// STOCK MOVEMENTS
// ============================================================================

/// Normalizes one `GET /stock_in` record into a [StockMovement].
///
/// The part name is resolved from the embedded name first, then by
/// looking the part reference up in `parts`, and falls back to
/// [UNRESOLVED_NAME]. Timestamps are converted to `offset` before the
/// calendar date is taken.
pub(crate) fn normalize_stock_in(
    dto: &StockInDto,
    parts: &[Part],
    offset: UtcOffset,
) -> StockMovement {
    let part_ref = id_reference(&dto.part_id);
    let raw_date = dto.date.clone().unwrap_or_default();

    StockMovement {
        id: canonical_id(&dto.stock_in_id, &dto.id),
        display_id: display_id(&dto.stock_in_id, &dto.id),
        part_name: resolve_part_name(&dto.part_name, &part_ref, parts),
        part_ref,
        quantity: optional_quantity(&dto.quantity),
        buying_price: optional_f64(&dto.buying_price),
        selling_price: None,
        date: parse_movement_date(&raw_date, offset),
        raw_date,
        direction: Direction::In,
    }
}

/// Normalizes one `GET /stock_out` record into a [StockMovement].
///
/// Mirrors [normalize_stock_in] with the issue-side field names and the
/// selling price in place of the buying price.
pub(crate) fn normalize_stock_out(
    dto: &StockOutDto,
    parts: &[Part],
    offset: UtcOffset,
) -> StockMovement {
    let part_ref = id_reference(&dto.part_id);
    let raw_date = dto.date.clone().unwrap_or_default();

    StockMovement {
        id: canonical_id(&dto.stock_out_id, &dto.id),
        display_id: display_id(&dto.stock_out_id, &dto.id),
        part_name: resolve_part_name(&dto.part_name, &part_ref, parts),
        part_ref,
        quantity: optional_quantity(&dto.quantity),
        buying_price: optional_f64(&dto.buying_price),
        selling_price: optional_f64(&dto.selling_price),
        date: parse_movement_date(&raw_date, offset),
        raw_date,
        direction: Direction::Out,
    }
}

fn resolve_part_name(embedded: &Option<String>, part_ref: &str, parts: &[Part]) -> String {
    if let Some(name) = embedded {
        let trimmed = name.trim();

        if !trimmed.is_empty() && trimmed != UNRESOLVED_NAME {
            return trimmed.to_string();
        }
    }

    if part_ref.is_empty() {
        return UNRESOLVED_NAME.to_string();
    }

    parts
        .iter()
        .find(|part| part.id == part_ref || part.display_id == part_ref)
        .map(|part| part.name.clone())
        .unwrap_or_else(|| UNRESOLVED_NAME.to_string())
}

/// Parses a movement date leniently.
///
/// Accepts plain `YYYY-MM-DD` dates, RFC 3339 timestamps (converted to
/// `offset` before taking the date), and timestamps without an offset
/// (taken at their stated calendar date). Anything else becomes `None`.
fn parse_movement_date(raw: &str, offset: UtcOffset) -> Option<Date> {
    if let Ok(date) = Date::parse(raw, DATE_ONLY) {
        return Some(date);
    }

    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(timestamp.to_offset(offset).date());
    }

    raw.get(..10)
        .and_then(|prefix| Date::parse(prefix, DATE_ONLY).ok())
}

// ============================================================================
// PARTS
// ============================================================================

/// Normalizes one `GET /spare_parts` record into a [Part].
///
/// Category and manufacturer names come from the embedded name fields
/// when present, otherwise from an id lookup against the respective
/// collections, otherwise [UNRESOLVED_NAME]. A missing or zero reorder
/// threshold becomes the server default of five units.
pub(crate) fn normalize_part(
    dto: &PartDto,
    categories: &[CategoryDto],
    manufacturers: &[ManufacturerDto],
) -> Part {
    let threshold = optional_quantity(&dto.low_stock_threshold);

    Part {
        id: canonical_id(&dto.part_id, &dto.id),
        display_id: display_id(&dto.part_id, &dto.id),
        name: non_empty(&dto.name),
        category: resolve_category(dto, categories),
        manufacturer: resolve_manufacturer(dto, manufacturers),
        quantity: optional_quantity(&dto.quantity),
        buying_price: optional_f64(&dto.buying_price),
        selling_price: optional_f64(&dto.selling_price),
        low_stock_threshold: if threshold == 0 {
            DEFAULT_LOW_STOCK_THRESHOLD
        } else {
            threshold
        },
    }
}

fn resolve_category(dto: &PartDto, categories: &[CategoryDto]) -> String {
    if let Some(name) = non_empty_opt(&dto.category_name) {
        return name;
    }

    let Some(reference) = dto.category.as_ref().map(IdValue::to_id_string) else {
        return UNRESOLVED_NAME.to_string();
    };

    categories
        .iter()
        .find(|category| {
            category.id.as_deref() == Some(reference.as_str())
                || matches_legacy_id(&category.category_id, &reference)
        })
        .and_then(|category| non_empty_opt(&category.name))
        .unwrap_or_else(|| UNRESOLVED_NAME.to_string())
}

fn resolve_manufacturer(dto: &PartDto, manufacturers: &[ManufacturerDto]) -> String {
    if let Some(name) = non_empty_opt(&dto.manufacturer_name) {
        return name;
    }

    let Some(reference) = dto.manufacturer.as_ref().map(IdValue::to_id_string) else {
        return UNRESOLVED_NAME.to_string();
    };

    manufacturers
        .iter()
        .find(|manufacturer| {
            manufacturer.id.as_deref() == Some(reference.as_str())
                || matches_legacy_id(&manufacturer.manufacturer_id, &reference)
        })
        .and_then(|manufacturer| non_empty_opt(&manufacturer.name))
        .unwrap_or_else(|| UNRESOLVED_NAME.to_string())
}

// ============================================================================
// LOOKUP COLLECTIONS
// ============================================================================

/// Normalizes one `GET /categories` record into a [Category].
pub(crate) fn normalize_category(dto: &CategoryDto) -> Category {
    Category {
        id: canonical_id(&dto.category_id, &dto.id),
        name: non_empty(&dto.name),
    }
}

/// Normalizes one `GET /manufacturers` record into a [Manufacturer].
pub(crate) fn normalize_manufacturer(dto: &ManufacturerDto) -> Manufacturer {
    Manufacturer {
        id: canonical_id(&dto.manufacturer_id, &dto.id),
        name: non_empty(&dto.name),
    }
}

// ============================================================================
// SHARED ID AND NAME HELPERS
// ============================================================================

/// Picks the canonical record id, preferring the opaque document id over
/// the legacy sequence id.
fn canonical_id(legacy: &Option<IdValue>, opaque: &Option<String>) -> String {
    opaque
        .clone()
        .or_else(|| legacy.as_ref().map(IdValue::to_id_string))
        .unwrap_or_default()
}

/// Derives the short id shown in tables and exports. Legacy records keep
/// their sequence id, opaque records show a fixed length prefix.
fn display_id(legacy: &Option<IdValue>, opaque: &Option<String>) -> String {
    match legacy {
        Some(id) => id.to_id_string(),
        None => opaque
            .as_deref()
            .map(|id| id.chars().take(DISPLAY_ID_LENGTH).collect())
            .unwrap_or_default(),
    }
}

fn id_reference(id: &Option<IdValue>) -> String {
    id.as_ref().map(IdValue::to_id_string).unwrap_or_default()
}

fn matches_legacy_id(legacy: &Option<IdValue>, reference: &str) -> bool {
    legacy
        .as_ref()
        .is_some_and(|id| id.to_id_string() == reference)
}

fn non_empty(name: &Option<String>) -> String {
    non_empty_opt(name).unwrap_or_else(|| UNRESOLVED_NAME.to_string())
}

fn non_empty_opt(name: &Option<String>) -> Option<String> {
    name.as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}


#[cfg(test)]
mod movement_date_tests {
    use time::macros::{date, offset};

    use super::parse_movement_date;

    #[test]
    fn parses_plain_date() {
        let got = parse_movement_date("2024-03-15", offset!(+2));

        assert_eq!(got, Some(date!(2024 - 03 - 15)));
    }

    #[test]
    fn converts_utc_timestamp_into_configured_offset() {
        // 23:30 UTC is already the next day in Kigali.
        let got = parse_movement_date("2024-03-14T23:30:00Z", offset!(+2));

        assert_eq!(got, Some(date!(2024 - 03 - 15)));
    }

    #[test]
    fn offsetless_timestamp_keeps_stated_date() {
        let got = parse_movement_date("2024-03-15T00:00:00", offset!(+2));

        assert_eq!(got, Some(date!(2024 - 03 - 15)));
    }

    #[test]
    fn garbage_becomes_none() {
        assert_eq!(parse_movement_date("not-a-date", offset!(+2)), None);
        assert_eq!(parse_movement_date("", offset!(+2)), None);
    }
}

#[cfg(test)]
mod display_id_tests {
    use time::macros::offset;

    use super::{normalize_stock_in, normalize_stock_out};
    use crate::record::wire::{StockInDto, StockOutDto};

    #[test]
    fn legacy_record_keeps_sequence_id() {
        let dto: StockInDto = serde_json::from_value(serde_json::json!({
            "StockInID": 12,
            "PartID": 3,
            "StockInQuantity": 1,
        }))
        .unwrap();

        let movement = normalize_stock_in(&dto, &[], offset!(+2));

        assert_eq!(movement.display_id, "12");
        assert_eq!(movement.id, "12");
    }

    #[test]
    fn opaque_record_shows_prefix() {
        let dto: StockOutDto = serde_json::from_value(serde_json::json!({
            "_id": "6507f1f77bcf86cd799439011",
            "PartID": "6507f1f77bcf86cd799439099",
            "StockOutQuantity": 2,
        }))
        .unwrap();

        let movement = normalize_stock_out(&dto, &[], offset!(+2));

        assert_eq!(movement.display_id, "6507f1f7");
        assert_eq!(movement.id, "6507f1f77bcf86cd799439011");
    }
}
