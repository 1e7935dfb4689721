//! Buyer input validation
//!
//! Turns an untyped JSON body into a [`BuyerInput`], or reports every problem
//! found as [`FieldErrors`]. Validation never fails in any other way: a body
//! that is not even an object is reported as an error on the `body` field.
//!
//! Normalization rules:
//! - `email`: empty string becomes absent
//! - `budgetMin` / `budgetMax`: numbers or numeric strings; empty becomes absent
//! - `tags`: a list, or one comma-separated string; entries are trimmed and
//!   empty entries dropped
//! - `bhk`: dropped unless the property type is Apartment or Villa
//! - `notes`, `status`: empty string becomes absent
//!
//! Any `ownerId`, `id` or timestamp in the body is ignored.

mod errors;

pub use errors::FieldErrors;

use std::sync::OnceLock;

use email_address::EmailAddress;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{Bhk, BuyerInput, BuyerStatus, City, PropertyType, Purpose, Source, Timeline};

pub const NAME_MIN_CHARS: usize = 2;
pub const NOTES_MAX_CHARS: usize = 1000;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_BHK_REQUIRED: &str = "required for Apartment/Villa";
pub const MSG_BUDGET_ORDER: &str = "must be ≥ budgetMin";

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("phone pattern is valid"))
}

/// Validate and normalize a raw buyer body
pub fn validate(raw: &Value) -> Result<BuyerInput, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(obj) = raw.as_object() else {
        errors.add("body", "Expected a JSON object");
        return Err(errors);
    };

    let full_name = required_string(obj, "fullName", &mut errors).and_then(|name| {
        if name.chars().count() < NAME_MIN_CHARS {
            errors.add("fullName", "Name must be at least 2 characters");
            None
        } else {
            Some(name)
        }
    });

    let email = optional_string(obj, "email", &mut errors).and_then(|email| {
        if EmailAddress::is_valid(&email) {
            Some(email)
        } else {
            errors.add("email", "Invalid email");
            None
        }
    });

    let phone = required_string(obj, "phone", &mut errors).and_then(|phone| {
        if phone_pattern().is_match(&phone) {
            Some(phone)
        } else {
            errors.add("phone", "Phone must be 10-15 digits");
            None
        }
    });

    let city = required_choice(obj, "city", City::parse, City::expected, &mut errors);
    let property_type = required_choice(
        obj,
        "propertyType",
        PropertyType::parse,
        PropertyType::expected,
        &mut errors,
    );
    let bhk = optional_choice(obj, "bhk", Bhk::parse, Bhk::expected, &mut errors);
    let purpose = required_choice(obj, "purpose", Purpose::parse, Purpose::expected, &mut errors);
    let timeline = required_choice(obj, "timeline", Timeline::parse, Timeline::expected, &mut errors);
    let source = required_choice(obj, "source", Source::parse, Source::expected, &mut errors);
    let status = optional_choice(
        obj,
        "status",
        BuyerStatus::parse,
        BuyerStatus::expected,
        &mut errors,
    );

    let budget_min = optional_budget(obj, "budgetMin", &mut errors);
    let budget_max = optional_budget(obj, "budgetMax", &mut errors);

    let notes = optional_string(obj, "notes", &mut errors).and_then(|notes| {
        if notes.chars().count() > NOTES_MAX_CHARS {
            errors.add("notes", "Max 1000 chars");
            None
        } else {
            Some(notes)
        }
    });

    let tags = normalize_tags(obj.get("tags"), &mut errors);

    // Cross-field rules only run on fields that parsed
    let bhk = match property_type {
        Some(pt) if pt.requires_bhk() => {
            if bhk.is_none() && !errors.contains("bhk") {
                errors.add("bhk", MSG_BHK_REQUIRED);
            }
            bhk
        }
        Some(_) => None,
        None => bhk,
    };

    if let (Some(min), Some(max)) = (budget_min, budget_max) {
        if max < min {
            errors.add("budgetMax", MSG_BUDGET_ORDER);
        }
    }

    match (full_name, phone, city, property_type, purpose, timeline, source) {
        (
            Some(full_name),
            Some(phone),
            Some(city),
            Some(property_type),
            Some(purpose),
            Some(timeline),
            Some(source),
        ) if errors.is_empty() => Ok(BuyerInput {
            full_name,
            email,
            phone,
            city,
            property_type,
            bhk,
            purpose,
            budget_min,
            budget_max,
            timeline,
            source,
            notes,
            tags,
            status,
        }),
        _ => Err(errors),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string(obj: &Map<String, Value>, key: &str, errors: &mut FieldErrors) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            errors.add(key, MSG_REQUIRED);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add(key, format!("Expected string, received {}", type_name(other)));
            None
        }
    }
}

/// Absent, null and "" all mean "not provided"
fn optional_string(obj: &Map<String, Value>, key: &str, errors: &mut FieldErrors) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.add(key, format!("Expected string, received {}", type_name(other)));
            None
        }
    }
}

fn required_choice<T>(
    obj: &Map<String, Value>,
    key: &str,
    parse: fn(&str) -> Option<T>,
    expected: fn() -> String,
    errors: &mut FieldErrors,
) -> Option<T> {
    let raw = required_string(obj, key, errors)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        errors.add(key, format!("Invalid option: expected one of {}", expected()));
    }
    parsed
}

fn optional_choice<T>(
    obj: &Map<String, Value>,
    key: &str,
    parse: fn(&str) -> Option<T>,
    expected: fn() -> String,
    errors: &mut FieldErrors,
) -> Option<T> {
    let raw = optional_string(obj, key, errors)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        errors.add(key, format!("Invalid option: expected one of {}", expected()));
    }
    parsed
}

fn optional_budget(obj: &Map<String, Value>, key: &str, errors: &mut FieldErrors) -> Option<f64> {
    let amount = match obj.get(key) {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.trim().is_empty() => return None,
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => {
                errors.add(key, "Expected number");
                return None;
            }
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) => n,
            None => {
                errors.add(key, "Expected number");
                return None;
            }
        },
        Some(other) => {
            errors.add(key, format!("Expected number, received {}", type_name(other)));
            return None;
        }
    };

    if !amount.is_finite() {
        errors.add(key, "Expected number");
        return None;
    }
    if amount < 0.0 {
        errors.add(key, "Must be greater than or equal to 0");
        return None;
    }
    Some(amount)
}

/// Split, trim and drop empty tags; keeps the submitted order
pub fn normalize_tags(value: Option<&Value>, errors: &mut FieldErrors) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(joined)) => split_tags(joined),
        Some(Value::Array(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(tag) => {
                        let tag = tag.trim();
                        if !tag.is_empty() {
                            tags.push(tag.to_string());
                        }
                    }
                    other => {
                        errors.add(
                            "tags",
                            format!("Expected string, received {}", type_name(other)),
                        );
                    }
                }
            }
            tags
        }
        Some(other) => {
            errors.add(
                "tags",
                format!("Expected string or list, received {}", type_name(other)),
            );
            Vec::new()
        }
    }
}

/// Split a comma-joined tag string
pub fn split_tags(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
