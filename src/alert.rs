//! Low stock alert records and the payloads of the alert lifecycle
//! endpoints.
//!
//! Alerts are produced and resolved server side; this module only
//! carries them. Like the other collections they arrive in both the
//! legacy and the opaque id shape.

use serde::Deserialize;

use crate::record::UNRESOLVED_NAME;
use crate::record::wire::{IdValue, NumberValue, optional_quantity};

/// How far below its threshold a part has fallen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// The part is exhausted.
    Critical,
    /// The part is at or below its reorder threshold.
    #[serde(other)]
    Warning,
}

impl AlertLevel {
    /// The lowercase form the API and the UI use.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "critical",
            AlertLevel::Warning => "warning",
        }
    }
}

/// One open alert from `GET /alerts?status=open`.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The alert id used for `POST /alerts/resolve/:id`.
    pub id: String,
    /// Reference to the part the alert is about.
    pub part_ref: String,
    /// Resolved part name, [UNRESOLVED_NAME] when the API omitted it.
    pub part_name: String,
    /// Alert severity.
    pub level: AlertLevel,
    /// Units on hand when the alert was last refreshed.
    pub quantity: u32,
    /// The reorder threshold the part fell below.
    pub threshold: u32,
    /// Creation timestamp as the API sent it.
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AlertDto {
    #[serde(default, alias = "_id")]
    pub id: Option<IdValue>,
    #[serde(default, rename = "PartID")]
    pub part_id: Option<IdValue>,
    #[serde(default, rename = "PartName")]
    pub part_name: Option<String>,
    #[serde(default)]
    pub level: Option<AlertLevel>,
    #[serde(default)]
    pub quantity: Option<NumberValue>,
    #[serde(default)]
    pub threshold: Option<NumberValue>,
    #[serde(default)]
    pub created_at: Option<String>,
}

pub(crate) fn normalize_alert(dto: &AlertDto) -> Alert {
    Alert {
        id: dto
            .id
            .as_ref()
            .map(IdValue::to_id_string)
            .unwrap_or_default(),
        part_ref: dto
            .part_id
            .as_ref()
            .map(IdValue::to_id_string)
            .unwrap_or_default(),
        part_name: dto
            .part_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNRESOLVED_NAME.to_string()),
        level: dto.level.unwrap_or(AlertLevel::Warning),
        quantity: optional_quantity(&dto.quantity),
        threshold: optional_quantity(&dto.threshold),
        created_at: dto.created_at.clone(),
    }
}

/// Result of `POST /alerts/check`, a server side scan that opens,
/// refreshes, and closes alerts in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CheckOutcome {
    /// Alerts opened by the scan.
    #[serde(default, rename = "alertsCreated")]
    pub created: u32,
    /// Open alerts refreshed with new quantities.
    #[serde(default, rename = "alertsUpdated")]
    pub updated: u32,
    /// Alerts closed because stock recovered.
    #[serde(default, rename = "alertsResolved")]
    pub resolved: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AlertCountDto {
    #[serde(default)]
    pub count: Option<NumberValue>,
}

impl AlertCountDto {
    pub(crate) fn count(&self) -> u32 {
        optional_quantity(&self.count)
    }
}


#[cfg(test)]
mod lifecycle_payload_tests {
    use super::{AlertCountDto, CheckOutcome};

    #[test]
    fn decodes_check_outcome() {
        let outcome: CheckOutcome = serde_json::from_value(serde_json::json!({
            "alertsCreated": 2,
            "alertsUpdated": 1,
            "alertsResolved": 4,
        }))
        .unwrap();

        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.resolved, 4);
    }

    #[test]
    fn missing_count_is_zero() {
        let count: AlertCountDto = serde_json::from_str("{}").unwrap();

        assert_eq!(count.count(), 0);
    }
}
