//! Serde representations of the inventory API payloads.
//!
//! The backing store migrated from integer sequence ids to opaque document
//! ids at some point, and the API still serves both generations side by
//! side. Every field here is therefore optional and identifiers accept
//! either a JSON number or a JSON string. [`normalize`](crate::record)
//! collapses these into the canonical record types.

use serde::Deserialize;

// ============================================================================
// FLEXIBLE SCALARS
// ============================================================================

/// An identifier that arrives as either a JSON number (legacy sequence id)
/// or a JSON string (opaque document id).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdValue {
    /// Legacy integer sequence id.
    Number(i64),
    /// Opaque string id.
    Text(String),
}

impl IdValue {
    /// Renders the id as a string, the only form the rest of the crate uses.
    pub(crate) fn to_id_string(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// A numeric field that some API versions serialize as a JSON string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberValue {
    /// The number as a JSON number.
    Number(f64),
    /// The number as a JSON string, for example `"12.50"`.
    Text(String),
}

impl NumberValue {
    /// Extracts the numeric value, or `None` when the text form does not
    /// parse as a number.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Extracts the value as a non-negative count, treating missing or
    /// malformed values as zero.
    pub(crate) fn as_quantity(&self) -> u32 {
        match self.as_f64() {
            Some(value) if value.is_finite() && value > 0.0 => value as u32,
            _ => 0,
        }
    }
}

/// Convenience for optional numeric fields.
pub(crate) fn optional_f64(value: &Option<NumberValue>) -> Option<f64> {
    value.as_ref().and_then(NumberValue::as_f64)
}

/// Convenience for optional count fields.
pub(crate) fn optional_quantity(value: &Option<NumberValue>) -> u32 {
    value.as_ref().map(NumberValue::as_quantity).unwrap_or(0)
}

// ============================================================================
// STOCK MOVEMENT PAYLOADS
// ============================================================================

/// One record from `GET /stock_in`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StockInDto {
    /// Legacy sequence id, absent on opaque-id records.
    #[serde(default, rename = "StockInID")]
    pub stock_in_id: Option<IdValue>,
    /// Opaque document id, absent on legacy records.
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    /// Reference to the part this receipt belongs to.
    #[serde(default, rename = "PartID")]
    pub part_id: Option<IdValue>,
    /// Part name embedded by some API versions.
    #[serde(default, rename = "PartName")]
    pub part_name: Option<String>,
    /// Units received.
    #[serde(default, rename = "StockInQuantity")]
    pub quantity: Option<NumberValue>,
    /// Unit cost at receipt time.
    #[serde(default)]
    pub buying_price: Option<NumberValue>,
    /// Receipt date as the API sent it.
    #[serde(default, rename = "StockInDate")]
    pub date: Option<String>,
}

/// One record from `GET /stock_out`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StockOutDto {
    /// Legacy sequence id, absent on opaque-id records.
    #[serde(default, rename = "StockOutID")]
    pub stock_out_id: Option<IdValue>,
    /// Opaque document id, absent on legacy records.
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    /// Reference to the part this issue belongs to.
    #[serde(default, rename = "PartID")]
    pub part_id: Option<IdValue>,
    /// Part name embedded by some API versions.
    #[serde(default, rename = "PartName")]
    pub part_name: Option<String>,
    /// Units issued.
    #[serde(default, rename = "StockOutQuantity")]
    pub quantity: Option<NumberValue>,
    /// Unit price at issue time.
    #[serde(default)]
    pub selling_price: Option<NumberValue>,
    /// Unit cost carried over from the receipt, used for profit totals.
    #[serde(default)]
    pub buying_price: Option<NumberValue>,
    /// Issue date as the API sent it.
    #[serde(default, rename = "StockOutDate")]
    pub date: Option<String>,
}

// ============================================================================
// CATALOGUE PAYLOADS
// ============================================================================

/// One record from `GET /spare_parts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PartDto {
    /// Legacy sequence id, absent on opaque-id records.
    #[serde(default, rename = "PartID")]
    pub part_id: Option<IdValue>,
    /// Opaque document id, absent on legacy records.
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    /// Part name.
    #[serde(default, rename = "Name", alias = "name")]
    pub name: Option<String>,
    /// Category reference, resolved against `GET /categories`.
    #[serde(default, rename = "Category")]
    pub category: Option<IdValue>,
    /// Category name embedded by some API versions.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Manufacturer reference, resolved against `GET /manufacturers`.
    #[serde(default, rename = "Manufacturer", alias = "manufacturer_id")]
    pub manufacturer: Option<IdValue>,
    /// Manufacturer name embedded by some API versions.
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    /// Units on hand.
    #[serde(default, rename = "Quantity")]
    pub quantity: Option<NumberValue>,
    /// Unit cost.
    #[serde(default)]
    pub buying_price: Option<NumberValue>,
    /// Unit price.
    #[serde(default)]
    pub selling_price: Option<NumberValue>,
    /// Reorder threshold, defaulted when the API omits it.
    #[serde(default, alias = "lowstock_threshold")]
    pub low_stock_threshold: Option<NumberValue>,
}

/// One record from `GET /categories`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CategoryDto {
    /// Legacy sequence id, absent on opaque-id records.
    #[serde(default, rename = "CategoryID")]
    pub category_id: Option<IdValue>,
    /// Opaque document id, absent on legacy records.
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    /// Category name.
    #[serde(default, rename = "CategoryName", alias = "name")]
    pub name: Option<String>,
}

/// One record from `GET /manufacturers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ManufacturerDto {
    /// Legacy sequence id, absent on opaque-id records.
    #[serde(default, rename = "ManufacturerID")]
    pub manufacturer_id: Option<IdValue>,
    /// Opaque document id, absent on legacy records.
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    /// Manufacturer name.
    #[serde(default, rename = "ManufacturerName", alias = "name")]
    pub name: Option<String>,
}


#[cfg(test)]
mod number_value_tests {
    use super::NumberValue;

    #[test]
    fn parses_string_encoded_number() {
        let value: NumberValue = serde_json::from_str("\"12.50\"").unwrap();

        assert_eq!(value.as_f64(), Some(12.5));
    }

    #[test]
    fn clamps_negative_quantity_to_zero() {
        let value = NumberValue::Number(-3.0);

        assert_eq!(value.as_quantity(), 0);
    }

    #[test]
    fn unparseable_string_is_none() {
        let value = NumberValue::Text("soon".to_string());

        assert_eq!(value.as_f64(), None);
    }
}
