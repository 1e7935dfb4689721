//! History display formatting

use crate::audit::{ChangeSet, HistoryEntry};
use crate::models::Buyer;

/// Format a buyer's history, newest entry first
pub fn format_history(buyer: &Buyer, entries: &[HistoryEntry]) -> String {
    let mut output = format!("History for {} ({})\n", buyer.full_name, buyer.id.short());

    if entries.is_empty() {
        output.push_str("  No history recorded.\n");
        return output;
    }

    for entry in entries {
        output.push('\n');
        output.push_str(&format!(
            "  {}  by {}\n",
            entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            entry.changed_by
        ));

        match &entry.diff {
            ChangeSet::Created { .. } => output.push_str("    created\n"),
            ChangeSet::Updated { changes, .. } => {
                let width = changes.keys().map(|k| k.len()).max().unwrap_or(0);
                for (field, change) in changes {
                    output.push_str(&format!(
                        "    {:<width$}  {} -> {}\n",
                        field,
                        plain(&change.old),
                        plain(&change.new),
                        width = width,
                    ));
                }
            }
        }
    }

    output
}

/// Render a field value without JSON quoting
fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) if items.is_empty() => "-".to_string(),
        serde_json::Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
