//! Export module for buyer-leads
//!
//! Writes filtered buyer lists in three formats:
//! - CSV: the fixed column set, spreadsheet-compatible
//! - JSON: full records with a versioned envelope
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_buyers_csv, CSV_HEADERS};
pub use json::{export_buyers_json, BuyerExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_buyers_yaml;
