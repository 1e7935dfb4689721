//! Buyer lead model
//!
//! `BuyerInput` is the validated, normalized shape of what a user submits.
//! `Buyer` is the stored record: the input fields plus identity, ownership,
//! status and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::choices::{Bhk, BuyerStatus, City, PropertyType, Purpose, Source, Timeline};
use super::ids::BuyerId;

/// Normalized buyer data as produced by validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInput {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub city: City,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bhk: Option<Bhk>,
    pub purpose: Purpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,
    pub timeline: Timeline,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Absent on update means "keep the stored status"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BuyerStatus>,
}

/// A stored buyer lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    /// Unique identifier
    pub id: BuyerId,

    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Digits only, 10 to 15 of them
    pub phone: String,

    pub city: City,

    pub property_type: PropertyType,

    /// Present exactly when the property type is Apartment or Villa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bhk: Option<Bhk>,

    pub purpose: Purpose,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,

    pub timeline: Timeline,

    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Principal id of the creator; never changes afterwards
    pub owner_id: String,

    #[serde(default)]
    pub status: BuyerStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// The user-editable fields of a buyer, in schema order
///
/// Diffing walks this list rather than whatever keys happen to be present,
/// so every change to an editable field is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuyerField {
    FullName,
    Email,
    Phone,
    City,
    PropertyType,
    Bhk,
    Purpose,
    BudgetMin,
    BudgetMax,
    Timeline,
    Source,
    Notes,
    Tags,
    Status,
}

impl BuyerField {
    pub const ALL: &'static [BuyerField] = &[
        BuyerField::FullName,
        BuyerField::Email,
        BuyerField::Phone,
        BuyerField::City,
        BuyerField::PropertyType,
        BuyerField::Bhk,
        BuyerField::Purpose,
        BuyerField::BudgetMin,
        BuyerField::BudgetMax,
        BuyerField::Timeline,
        BuyerField::Source,
        BuyerField::Notes,
        BuyerField::Tags,
        BuyerField::Status,
    ];

    /// Wire name of the field (camelCase, as in the JSON body)
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::City => "city",
            Self::PropertyType => "propertyType",
            Self::Bhk => "bhk",
            Self::Purpose => "purpose",
            Self::BudgetMin => "budgetMin",
            Self::BudgetMax => "budgetMax",
            Self::Timeline => "timeline",
            Self::Source => "source",
            Self::Notes => "notes",
            Self::Tags => "tags",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for BuyerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn opt_str(value: &Option<String>) -> Value {
    value.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
}

fn opt_num(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::from)
}

impl Buyer {
    /// Build a new record from validated input, owned by `owner_id`
    pub fn from_input(input: BuyerInput, owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BuyerId::new(),
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            city: input.city,
            property_type: input.property_type,
            bhk: input.bhk,
            purpose: input.purpose,
            budget_min: input.budget_min,
            budget_max: input.budget_max,
            timeline: input.timeline,
            source: input.source,
            notes: input.notes,
            tags: input.tags,
            owner_id: owner_id.into(),
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Produce the record that results from overwriting every editable field
    ///
    /// Identity, owner and creation time carry over; status is only replaced
    /// when the input names one.
    pub fn overwritten_with(&self, input: BuyerInput) -> Self {
        Self {
            id: self.id,
            full_name: input.full_name,
            email: input.email,
            phone: input.phone,
            city: input.city,
            property_type: input.property_type,
            bhk: input.bhk,
            purpose: input.purpose,
            budget_min: input.budget_min,
            budget_max: input.budget_max,
            timeline: input.timeline,
            source: input.source,
            notes: input.notes,
            tags: input.tags,
            owner_id: self.owner_id.clone(),
            status: input.status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }

    /// The editable fields of this record as input, e.g. to pre-fill an edit
    pub fn to_input(&self) -> BuyerInput {
        BuyerInput {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            city: self.city,
            property_type: self.property_type,
            bhk: self.bhk,
            purpose: self.purpose,
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            timeline: self.timeline,
            source: self.source,
            notes: self.notes.clone(),
            tags: self.tags.clone(),
            status: Some(self.status),
        }
    }

    /// Current value of one editable field; absent values are `null`
    pub fn field_value(&self, field: BuyerField) -> Value {
        match field {
            BuyerField::FullName => Value::String(self.full_name.clone()),
            BuyerField::Email => opt_str(&self.email),
            BuyerField::Phone => Value::String(self.phone.clone()),
            BuyerField::City => Value::String(self.city.as_str().to_string()),
            BuyerField::PropertyType => Value::String(self.property_type.as_str().to_string()),
            BuyerField::Bhk => self
                .bhk
                .map_or(Value::Null, |b| Value::String(b.as_str().to_string())),
            BuyerField::Purpose => Value::String(self.purpose.as_str().to_string()),
            BuyerField::BudgetMin => opt_num(self.budget_min),
            BuyerField::BudgetMax => opt_num(self.budget_max),
            BuyerField::Timeline => Value::String(self.timeline.as_str().to_string()),
            BuyerField::Source => Value::String(self.source.as_str().to_string()),
            BuyerField::Notes => opt_str(&self.notes),
            BuyerField::Tags => Value::Array(
                self.tags
                    .iter()
                    .map(|t| Value::String(t.clone()))
                    .collect(),
            ),
            BuyerField::Status => Value::String(self.status.as_str().to_string()),
        }
    }

    /// Format the budget range for display, e.g. "5000000 – 7500000"
    pub fn budget_display(&self) -> String {
        match (self.budget_min, self.budget_max) {
            (None, None) => "-".to_string(),
            (min, max) => format!(
                "{} – {}",
                min.map(format_amount).unwrap_or_default(),
                max.map(format_amount).unwrap_or_default()
            ),
        }
    }
}

/// Render an amount without a trailing ".0" for whole numbers
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

impl fmt::Display for Buyer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> BuyerInput {
        BuyerInput {
            full_name: "Jo Lee".into(),
            email: None,
            phone: "9876543210".into(),
            city: City::Mohali,
            property_type: PropertyType::Plot,
            bhk: None,
            purpose: Purpose::Buy,
            budget_min: None,
            budget_max: None,
            timeline: Timeline::ZeroToThreeMonths,
            source: Source::Website,
            notes: None,
            tags: vec![],
            status: None,
        }
    }

    #[test]
    fn test_from_input_sets_owner_and_default_status() {
        let buyer = Buyer::from_input(sample_input(), "u1");
        assert_eq!(buyer.owner_id, "u1");
        assert_eq!(buyer.status, BuyerStatus::New);
        assert_eq!(buyer.created_at, buyer.updated_at);
    }

    #[test]
    fn test_overwrite_keeps_identity_owner_and_status() {
        let mut original = Buyer::from_input(sample_input(), "u1");
        original.status = BuyerStatus::Qualified;

        let mut input = sample_input();
        input.full_name = "Jo Lee Singh".into();
        let updated = original.overwritten_with(input);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.owner_id, "u1");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.status, BuyerStatus::Qualified);
        assert_eq!(updated.full_name, "Jo Lee Singh");
    }

    #[test]
    fn test_overwrite_replaces_optional_fields() {
        let mut input = sample_input();
        input.email = Some("jo@example.com".into());
        let original = Buyer::from_input(input, "u1");

        let updated = original.overwritten_with(sample_input());
        assert!(updated.email.is_none());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let buyer = Buyer::from_input(sample_input(), "u1");
        let json = serde_json::to_value(&buyer).unwrap();

        assert!(json.get("bhk").is_none());
        assert!(json.get("email").is_none());
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["propertyType"], "Plot");
        assert_eq!(json["timeline"], "0-3m");
    }

    #[test]
    fn test_field_value_covers_schema() {
        let buyer = Buyer::from_input(sample_input(), "u1");
        assert_eq!(buyer.field_value(BuyerField::Bhk), Value::Null);
        assert_eq!(buyer.field_value(BuyerField::City), Value::from("Mohali"));
        assert_eq!(buyer.field_value(BuyerField::Tags), serde_json::json!([]));
        assert_eq!(BuyerField::ALL.len(), 14);
    }

    #[test]
    fn test_budget_display() {
        let mut input = sample_input();
        input.budget_min = Some(5_000_000.0);
        input.budget_max = Some(7_500_000.5);
        let buyer = Buyer::from_input(input, "u1");
        assert_eq!(buyer.budget_display(), "5000000 – 7500000.5");
    }
}
