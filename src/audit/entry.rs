//! History entry data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::ChangeSet;
use crate::models::{BuyerId, HistoryId};

/// One immutable record of a mutation to a buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,

    /// The buyer this entry describes
    pub buyer_id: BuyerId,

    /// Principal id of whoever made the change
    pub changed_by: String,

    pub diff: ChangeSet,

    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(buyer_id: BuyerId, changed_by: impl Into<String>, diff: ChangeSet) -> Self {
        Self {
            id: HistoryId::new(),
            buyer_id,
            changed_by: changed_by.into(),
            created_at: diff.timestamp(),
            diff,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self.diff, ChangeSet::Created { .. })
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        format!(
            "[{}] {} by {}: {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.buyer_id.short(),
            self.changed_by,
            self.diff.summary()
        )
    }
}
