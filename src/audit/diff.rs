//! Change sets between buyer snapshots
//!
//! Diffing walks [`BuyerField::ALL`] instead of arbitrary object keys, so the
//! result is exhaustive over editable fields and independent of how a record
//! happens to serialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{Buyer, BuyerField};

/// Old and new value of one changed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// What a single mutation did to a buyer
///
/// Serializes as `{"created": {...}, "timestamp": ...}` for creation and as
/// `{"<field>": {"old": .., "new": ..}, ..., "timestamp": ...}` for updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeSet {
    Created {
        created: Box<Buyer>,
        timestamp: DateTime<Utc>,
    },
    Updated {
        #[serde(flatten)]
        changes: BTreeMap<String, FieldChange>,
        timestamp: DateTime<Utc>,
    },
}

impl ChangeSet {
    /// True for an update that changed nothing
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Created { .. } => false,
            Self::Updated { changes, .. } => changes.is_empty(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Created { timestamp, .. } | Self::Updated { timestamp, .. } => *timestamp,
        }
    }

    /// Names of the changed fields; empty for creation
    pub fn changed_fields(&self) -> Vec<&str> {
        match self {
            Self::Created { .. } => Vec::new(),
            Self::Updated { changes, .. } => changes.keys().map(String::as_str).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        match self {
            Self::Created { .. } => None,
            Self::Updated { changes, .. } => changes.get(field),
        }
    }

    /// One-line description, e.g. `status: "New" -> "Qualified"`
    pub fn summary(&self) -> String {
        match self {
            Self::Created { created, .. } => format!("created {}", created),
            Self::Updated { changes, .. } if changes.is_empty() => "no changes".to_string(),
            Self::Updated { changes, .. } => changes
                .iter()
                .map(|(field, change)| {
                    format!(
                        "{}: {} -> {}",
                        field,
                        format_value(&change.old),
                        format_value(&change.new)
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Compute the change set from `previous` to `next`
///
/// With no previous snapshot this is a creation and always non-empty.
/// Otherwise every editable field is compared by exact value equality; tags
/// compare element-wise and order-sensitively.
pub fn diff(previous: Option<&Buyer>, next: &Buyer) -> ChangeSet {
    let timestamp = Utc::now();

    let Some(previous) = previous else {
        return ChangeSet::Created {
            created: Box::new(next.clone()),
            timestamp,
        };
    };

    let changes = BuyerField::ALL
        .iter()
        .filter_map(|&field| {
            let old = previous.field_value(field);
            let new = next.field_value(field);
            (old != new).then(|| (field.name().to_string(), FieldChange { old, new }))
        })
        .collect();

    ChangeSet::Updated { changes, timestamp }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuyerInput, BuyerStatus, City, PropertyType, Purpose, Source, Timeline};
    use serde_json::json;

    fn buyer() -> Buyer {
        Buyer::from_input(
            BuyerInput {
                full_name: "Jo Lee".into(),
                email: None,
                phone: "9876543210".into(),
                city: City::Mohali,
                property_type: PropertyType::Plot,
                bhk: None,
                purpose: Purpose::Buy,
                budget_min: Some(100.0),
                budget_max: None,
                timeline: Timeline::ZeroToThreeMonths,
                source: Source::Website,
                notes: Some("call after 6".into()),
                tags: vec!["a".into(), "b".into()],
                status: None,
            },
            "u1",
        )
    }

    #[test]
    fn test_creation_carries_full_record() {
        let next = buyer();
        let change = diff(None, &next);
        assert!(!change.is_noop());
        match &change {
            ChangeSet::Created { created, .. } => assert_eq!(**created, next),
            other => panic!("expected creation, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_snapshots_are_noop() {
        let before = buyer();
        let mut after = before.clone();
        after.updated_at = Utc::now();
        assert!(diff(Some(&before), &after).is_noop());
    }

    #[test]
    fn test_single_field_change() {
        let before = buyer();
        let mut after = before.clone();
        after.status = BuyerStatus::Qualified;

        let change = diff(Some(&before), &after);
        assert_eq!(change.changed_fields(), vec!["status"]);
        assert_eq!(
            change.get("status"),
            Some(&FieldChange {
                old: json!("New"),
                new: json!("Qualified")
            })
        );
    }

    #[test]
    fn test_cleared_optional_field_is_a_change() {
        let before = buyer();
        let mut after = before.clone();
        after.notes = None;

        let change = diff(Some(&before), &after);
        assert_eq!(
            change.get("notes"),
            Some(&FieldChange {
                old: json!("call after 6"),
                new: Value::Null
            })
        );
    }

    #[test]
    fn test_tags_compare_in_order() {
        let before = buyer();
        let mut after = before.clone();
        after.tags = vec!["b".into(), "a".into()];

        let change = diff(Some(&before), &after);
        assert_eq!(change.changed_fields(), vec!["tags"]);
    }

    #[test]
    fn test_budget_number_change() {
        let before = buyer();
        let mut after = before.clone();
        after.budget_min = Some(150.0);
        after.budget_max = Some(300.0);

        let change = diff(Some(&before), &after);
        assert_eq!(change.changed_fields(), vec!["budgetMax", "budgetMin"]);
    }

    #[test]
    fn test_update_serialization_shape() {
        let before = buyer();
        let mut after = before.clone();
        after.city = City::Zirakpur;

        let change = diff(Some(&before), &after);
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["city"]["old"], "Mohali");
        assert_eq!(value["city"]["new"], "Zirakpur");
        assert!(value.get("timestamp").is_some());

        let back: ChangeSet = serde_json::from_value(value).unwrap();
        assert_eq!(back, change);
    }

    #[test]
    fn test_created_serialization_shape() {
        let change = diff(None, &buyer());
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["created"]["fullName"], "Jo Lee");
        assert_eq!(value["created"]["ownerId"], "u1");

        let back: ChangeSet = serde_json::from_value(value).unwrap();
        assert!(matches!(back, ChangeSet::Created { .. }));
    }

    #[test]
    fn test_summary() {
        let before = buyer();
        let mut after = before.clone();
        after.status = BuyerStatus::Contacted;
        let summary = diff(Some(&before), &after).summary();
        assert_eq!(summary, "status: \"New\" -> \"Contacted\"");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(["a", "b"])), "[\"a\", \"b\"]");
        assert!(format_value(&json!("x".repeat(80))).ends_with("...\""));
    }
}
