//! JSON Export functionality
//!
//! Exports buyers with an envelope carrying schema version and counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LeadsError, LeadsResult};
use crate::models::Buyer;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Buyer export document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    /// Filters the export was taken with, for reference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    pub count: usize,
    pub buyers: Vec<Buyer>,
}

impl BuyerExport {
    pub fn new(buyers: Vec<Buyer>, filters: Vec<String>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            filters,
            count: buyers.len(),
            buyers,
        }
    }
}

/// Write an export document as JSON
pub fn export_buyers_json<W: Write>(export: &BuyerExport, writer: W, pretty: bool) -> LeadsResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    };
    result.map_err(|e| LeadsError::Export(e.to_string()))
}
