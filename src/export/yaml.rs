//! YAML Export functionality

use std::io::Write;

use crate::error::{LeadsError, LeadsResult};
use crate::export::json::BuyerExport;

/// Write an export document as YAML with a short header comment
pub fn export_buyers_yaml<W: Write>(export: &BuyerExport, mut writer: W) -> LeadsResult<()> {
    writeln!(writer, "# buyer-leads export")
        .and_then(|_| writeln!(writer, "# Generated: {}", export.exported_at))
        .and_then(|_| writeln!(writer, "# Buyers: {}", export.count))
        .and_then(|_| writeln!(writer))
        .map_err(|e| LeadsError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| LeadsError::Export(e.to_string()))
}
