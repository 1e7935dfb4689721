//! Append-only buyer history log
//!
//! Each entry is written as a single JSON line and flushed immediately.
//! Entries are never rewritten, so concurrent appenders do not contend over
//! existing data.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{LeadsError, LeadsResult};
use crate::models::BuyerId;

use super::entry::HistoryEntry;

/// Reads and appends history entries in a line-delimited JSON file
pub struct HistoryLog {
    log_path: PathBuf,
}

impl HistoryLog {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush
    pub fn append(&self, entry: &HistoryEntry) -> LeadsResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| LeadsError::Json(format!("Failed to serialize history entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LeadsError::Io(format!("Failed to open history log: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LeadsError::Io(format!("Failed to write history entry: {}", e)))?;

        file.flush()
            .map_err(|e| LeadsError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Read every entry, oldest first
    pub fn read_all(&self) -> LeadsResult<Vec<HistoryEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LeadsError::Io(format!("Failed to open history log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                LeadsError::Io(format!("Failed to read history line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: HistoryEntry = serde_json::from_str(&line).map_err(|e| {
                LeadsError::Json(format!(
                    "Failed to parse history entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Entries for one buyer, newest first
    pub fn for_buyer(&self, buyer_id: &BuyerId) -> LeadsResult<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| &e.buyer_id == buyer_id)
            .collect();
        entries.reverse();
        Ok(entries)
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::diff::{ChangeSet, FieldChange};
    use chrono::Utc;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn create_test_log() -> (HistoryLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = HistoryLog::new(temp_dir.path().join("buyer_history.jsonl"));
        (log, temp_dir)
    }

    fn entry_for(buyer_id: BuyerId, new_status: &str) -> HistoryEntry {
        let mut changes = BTreeMap::new();
        changes.insert(
            "status".to_string(),
            FieldChange {
                old: json!("New"),
                new: json!(new_status),
            },
        );
        HistoryEntry::new(
            buyer_id,
            "u1",
            ChangeSet::Updated {
                changes,
                timestamp: Utc::now(),
            },
        )
    }

    #[test]
    fn test_append_and_read() {
        let (log, _temp) = create_test_log();
        let entry = entry_for(BuyerId::new(), "Qualified");
        log.append(&entry).unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_for_buyer_filters_and_orders_newest_first() {
        let (log, _temp) = create_test_log();
        let a = BuyerId::new();
        let b = BuyerId::new();

        log.append(&entry_for(a, "Qualified")).unwrap();
        log.append(&entry_for(b, "Contacted")).unwrap();
        log.append(&entry_for(a, "Visited")).unwrap();

        let for_a = log.for_buyer(&a).unwrap();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].diff.get("status").unwrap().new, json!("Visited"));
        assert_eq!(for_a[1].diff.get("status").unwrap().new, json!("Qualified"));
    }

    #[test]
    fn test_empty_log() {
        let (log, _temp) = create_test_log();
        assert!(!log.exists());
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_survives_restart() {
        let (log, temp) = create_test_log();
        log.append(&entry_for(BuyerId::new(), "Dropped")).unwrap();

        let reopened = HistoryLog::new(temp.path().join("buyer_history.jsonl"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (log, _temp) = create_test_log();
        log.append(&entry_for(BuyerId::new(), "Qualified")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .unwrap()
            .write_all(b"{not json\n")
            .unwrap();

        let err = log.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
