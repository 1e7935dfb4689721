//! Field-level validation errors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Validation messages keyed by field name
///
/// Serializes as `{"phone": ["Phone must be 10-15 digits"], ...}` so callers
/// can attach each message to its form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Field names with errors, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when no errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.add("phone", "Phone must be 10-15 digits");
        errors.add("phone", "Required");
        errors.add("bhk", "required for Apartment/Villa");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("phone").unwrap().len(), 2);
        assert!(errors.contains("bhk"));
        assert!(!errors.contains("email"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["bhk", "phone"]);
    }

    #[test]
    fn test_display() {
        let mut errors = FieldErrors::new();
        errors.add("fullName", "Name must be at least 2 characters");
        errors.add("notes", "Max 1000 chars");

        assert_eq!(
            errors.to_string(),
            "fullName: Name must be at least 2 characters; notes: Max 1000 chars"
        );
    }

    #[test]
    fn test_serializes_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("budgetMax", "must be ≥ budgetMin");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"budgetMax": ["must be ≥ budgetMin"]}));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5), Ok(5));

        let mut errors = FieldErrors::new();
        errors.add("city", "Required");
        assert!(errors.into_result(5).is_err());
    }
}
