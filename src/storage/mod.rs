//! Storage layer for buyer-leads
//!
//! JSON file repositories with atomic writes for buyers and users, plus the
//! append-only history log. [`LeadStore`] is the persistence boundary the
//! mutation and query services are written against.

pub mod buyers;
pub mod file_io;
pub mod filter;
pub mod users;

pub use buyers::BuyerRepository;
pub use file_io::{read_json, with_exclusive_lock, write_json_atomic};
pub use filter::{BuyerFilter, Page};
pub use users::UserRepository;

use tracing::error;

use crate::audit::{HistoryEntry, HistoryLog};
use crate::config::paths::LeadsPaths;
use crate::error::{LeadsError, LeadsResult};
use crate::models::{Buyer, BuyerId};

/// Point reads and writes of buyers, history appends and filtered scans
///
/// Write failures come back as [`LeadsError::Persistence`]; storage detail
/// stays in the message for logging only.
pub trait LeadStore: Send + Sync {
    fn get_buyer(&self, id: &BuyerId) -> LeadsResult<Option<Buyer>>;

    fn insert_buyer(&self, buyer: &Buyer) -> LeadsResult<()>;

    /// Replace every field of an existing buyer
    fn overwrite_buyer(&self, buyer: &Buyer) -> LeadsResult<()>;

    fn append_history(&self, entry: &HistoryEntry) -> LeadsResult<()>;

    /// Matching buyers, newest update first, with the total match count
    fn scan_buyers(&self, filter: &BuyerFilter, page: Option<Page>) -> LeadsResult<(Vec<Buyer>, usize)>;

    /// History of one buyer, newest first
    fn history_for(&self, id: &BuyerId) -> LeadsResult<Vec<HistoryEntry>>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LeadsPaths,
    pub buyers: BuyerRepository,
    pub users: UserRepository,
    pub history: HistoryLog,
}

impl Storage {
    pub fn new(paths: LeadsPaths) -> Result<Self, LeadsError> {
        paths.ensure_directories()?;

        Ok(Self {
            buyers: BuyerRepository::new(paths.buyers_file()),
            users: UserRepository::new(paths.users_file()),
            history: HistoryLog::new(paths.history_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &LeadsPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LeadsError> {
        self.buyers.load()?;
        self.users.load()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

fn persistence_failure(operation: &str, err: LeadsError) -> LeadsError {
    error!(operation, error = %err, "buyer write failed");
    LeadsError::Persistence(format!("{}: {}", operation, err))
}

impl LeadStore for Storage {
    fn get_buyer(&self, id: &BuyerId) -> LeadsResult<Option<Buyer>> {
        self.buyers.get(id)
    }

    fn insert_buyer(&self, buyer: &Buyer) -> LeadsResult<()> {
        self.buyers
            .insert(buyer.clone())
            .map_err(|e| persistence_failure("insert buyer", e))
    }

    fn overwrite_buyer(&self, buyer: &Buyer) -> LeadsResult<()> {
        self.buyers
            .overwrite(buyer.clone())
            .map_err(|e| persistence_failure("overwrite buyer", e))
    }

    fn append_history(&self, entry: &HistoryEntry) -> LeadsResult<()> {
        self.history.append(entry)
    }

    fn scan_buyers(&self, filter: &BuyerFilter, page: Option<Page>) -> LeadsResult<(Vec<Buyer>, usize)> {
        self.buyers.scan(filter, page)
    }

    fn history_for(&self, id: &BuyerId) -> LeadsResult<Vec<HistoryEntry>> {
        self.history.for_buyer(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LeadsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert!(!storage.history.exists());
    }

    #[test]
    fn test_missing_buyer_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(LeadsPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        assert!(storage.get_buyer(&BuyerId::new()).unwrap().is_none());
        assert!(storage.history_for(&BuyerId::new()).unwrap().is_empty());
    }
}
