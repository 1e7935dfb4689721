//! Custom error types for buyer-leads
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every variant maps onto one of the
//! transport-level outcomes (400/401/403/404/500) through [`LeadsError::status_code`].

use thiserror::Error;

use crate::validation::FieldErrors;

/// The main error type for buyer-leads operations
#[derive(Error, Debug)]
pub enum LeadsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Field-level rejection of buyer input
    #[error("Invalid input: {0}")]
    InvalidInput(FieldErrors),

    /// Validation errors for non-buyer input (signup forms, CLI flags)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, malformed, expired or tampered credential
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated but not permitted to touch the record
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The record write itself failed; nothing was stored
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// The record was stored but its history entry could not be appended
    #[error("Buyer {buyer_id} saved but history entry was not recorded: {message}")]
    AuditWrite { buyer_id: String, message: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Token signing or password hashing failed
    #[error("Credential error: {0}")]
    Crypto(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LeadsError {
    /// Create a "not found" error for buyers
    pub fn buyer_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Buyer",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a field-level input rejection
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Validation(_))
    }

    /// Field errors carried by an input rejection, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }

    /// Status code a request/response transport reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::Validation(_) | Self::Duplicate { .. } => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Persistence(_)
            | Self::AuditWrite { .. }
            | Self::Storage(_)
            | Self::Crypto(_)
            | Self::Export(_) => 500,
        }
    }

    /// Message safe to show the caller
    ///
    /// Storage-layer detail stays in the logs; callers get a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Storage(_) | Self::Io(_) | Self::Json(_) => {
                "Internal error while saving data".to_string()
            }
            Self::AuditWrite { buyer_id, .. } => {
                format!("Buyer {} was saved, but its history entry could not be recorded", buyer_id)
            }
            other => other.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LeadsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LeadsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<FieldErrors> for LeadsError {
    fn from(errors: FieldErrors) -> Self {
        Self::InvalidInput(errors)
    }
}

/// Result type alias for buyer-leads operations
pub type LeadsResult<T> = Result<T, LeadsError>;
