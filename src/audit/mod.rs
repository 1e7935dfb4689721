//! Buyer history: what changed, who changed it, and when
//!
//! - [`diff`] computes a [`ChangeSet`] between two buyer snapshots (or a
//!   creation when there is no previous snapshot).
//! - [`HistoryEntry`] wraps a change set with the buyer id and the principal.
//! - [`HistoryLog`] appends entries to a line-delimited JSON file.
//!
//! # Example
//!
//! ```rust,ignore
//! use buyer_leads::audit::{diff, HistoryEntry, HistoryLog};
//!
//! let log = HistoryLog::new(paths.history_file());
//! let changes = diff(Some(&before), &after);
//! if !changes.is_noop() {
//!     log.append(&HistoryEntry::new(after.id, &principal.id, changes))?;
//! }
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{diff, ChangeSet, FieldChange};
pub use entry::HistoryEntry;
pub use logger::HistoryLog;
