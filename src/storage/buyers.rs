//! Buyer repository for JSON storage
//!
//! Manages loading and saving buyers to buyers.json. Reads are served from
//! the copy taken at `load`; each write re-reads the file under a lock so
//! concurrent `leads` processes never drop each other's records.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockWriteGuard};

use crate::error::LeadsError;
use crate::models::{Buyer, BuyerId};

use super::file_io::{read_json, with_exclusive_lock, write_json_atomic};
use super::filter::{BuyerFilter, Page};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BuyerData {
    buyers: Vec<Buyer>,
}

/// Repository for buyer persistence
pub struct BuyerRepository {
    path: PathBuf,
    data: RwLock<HashMap<BuyerId, Buyer>>,
}

impl BuyerRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load buyers from disk
    pub fn load(&self) -> Result<(), LeadsError> {
        let fresh = self.read_file()?;
        *self.write_data()? = fresh;
        Ok(())
    }

    fn read_file(&self) -> Result<HashMap<BuyerId, Buyer>, LeadsError> {
        let file_data: BuyerData = read_json(&self.path)?;
        Ok(file_data.buyers.into_iter().map(|b| (b.id, b)).collect())
    }

    fn write_data(&self) -> Result<RwLockWriteGuard<'_, HashMap<BuyerId, Buyer>>, LeadsError> {
        self.data
            .write()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Apply one change to the file as it is on disk now
    ///
    /// Runs under the file lock: re-reads `buyers.json`, applies `change`,
    /// writes the result and adopts it as the in-memory copy. Records written
    /// by other processes since `load` are kept. On any error neither disk nor
    /// memory changes.
    fn apply<F>(&self, change: F) -> Result<(), LeadsError>
    where
        F: FnOnce(&mut HashMap<BuyerId, Buyer>) -> Result<(), LeadsError>,
    {
        let mut data = self.write_data()?;

        with_exclusive_lock(&self.path, || {
            let mut fresh = self.read_file()?;
            change(&mut fresh)?;

            let mut buyers: Vec<Buyer> = fresh.values().cloned().collect();
            buyers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            write_json_atomic(&self.path, &BuyerData { buyers })?;

            *data = fresh;
            Ok(())
        })
    }

    pub fn get(&self, id: &BuyerId) -> Result<Option<Buyer>, LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(id).cloned())
    }

    /// Store a new buyer; fails if the id is already taken
    pub fn insert(&self, buyer: Buyer) -> Result<(), LeadsError> {
        self.apply(|buyers| {
            if buyers.contains_key(&buyer.id) {
                return Err(LeadsError::Duplicate {
                    entity_type: "Buyer",
                    identifier: buyer.id.to_string(),
                });
            }
            buyers.insert(buyer.id, buyer);
            Ok(())
        })
    }

    /// Replace a stored buyer in full; fails if it does not exist
    pub fn overwrite(&self, buyer: Buyer) -> Result<(), LeadsError> {
        self.apply(|buyers| match buyers.get_mut(&buyer.id) {
            Some(slot) => {
                *slot = buyer;
                Ok(())
            }
            None => Err(LeadsError::buyer_not_found(buyer.id.to_string())),
        })
    }

    /// Buyers matching `filter`, most recently updated first
    ///
    /// Returns the requested page (or everything with no page) together with
    /// the total number of matches.
    pub fn scan(
        &self,
        filter: &BuyerFilter,
        page: Option<Page>,
    ) -> Result<(Vec<Buyer>, usize), LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut matches: Vec<Buyer> = data.values().filter(|b| filter.matches(b)).cloned().collect();
        matches.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total = matches.len();
        let rows = match page {
            Some(page) => matches.into_iter().skip(page.skip()).take(page.size).collect(),
            None => matches,
        };
        Ok((rows, total))
    }

    pub fn count(&self) -> Result<usize, LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuyerInput, BuyerStatus, City, PropertyType, Purpose, Source, Timeline};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BuyerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BuyerRepository::new(temp_dir.path().join("buyers.json"));
        (temp_dir, repo)
    }

    fn buyer(name: &str) -> Buyer {
        Buyer::from_input(
            BuyerInput {
                full_name: name.into(),
                email: None,
                phone: "9876543210".into(),
                city: City::Chandigarh,
                property_type: PropertyType::Office,
                bhk: None,
                purpose: Purpose::Rent,
                budget_min: None,
                budget_max: None,
                timeline: Timeline::ThreeToSixMonths,
                source: Source::Referral,
                notes: None,
                tags: Vec::new(),
                status: None,
            },
            "u1",
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_reload() {
        let (temp, repo) = create_test_repo();
        let b = buyer("Jo Lee");
        let id = b.id;
        repo.insert(b.clone()).unwrap();

        let repo2 = BuyerRepository::new(temp.path().join("buyers.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(&id).unwrap(), Some(b));
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let (_temp, repo) = create_test_repo();
        let b = buyer("Jo Lee");
        repo.insert(b.clone()).unwrap();
        assert!(matches!(repo.insert(b), Err(LeadsError::Duplicate { .. })));
    }

    #[test]
    fn test_overwrite_replaces_record() {
        let (_temp, repo) = create_test_repo();
        let b = buyer("Jo Lee");
        repo.insert(b.clone()).unwrap();

        let mut changed = b.clone();
        changed.status = BuyerStatus::Visited;
        repo.overwrite(changed).unwrap();

        assert_eq!(repo.get(&b.id).unwrap().unwrap().status, BuyerStatus::Visited);
    }

    #[test]
    fn test_overwrite_missing_is_not_found() {
        let (_temp, repo) = create_test_repo();
        let err = repo.overwrite(buyer("Ghost")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = temp.path().join("buyers.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let repo = BuyerRepository::new(path);

        assert!(repo.insert(buyer("Jo Lee")).is_err());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_writers_on_one_file_keep_each_others_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("buyers.json");
        let first = BuyerRepository::new(path.clone());
        let second = BuyerRepository::new(path.clone());
        first.load().unwrap();
        second.load().unwrap();

        let a = buyer("Asha Rao");
        let b = buyer("Ravi Nair");
        first.insert(a.clone()).unwrap();
        second.insert(b.clone()).unwrap();

        // `first` never saw `b`; its overwrite must not drop it
        let mut edited = a.clone();
        edited.status = BuyerStatus::Visited;
        first.overwrite(edited).unwrap();

        let reader = BuyerRepository::new(path);
        reader.load().unwrap();
        assert_eq!(reader.count().unwrap(), 2);
        assert_eq!(reader.get(&a.id).unwrap().unwrap().status, BuyerStatus::Visited);
        assert!(reader.get(&b.id).unwrap().is_some());
        assert_eq!(first.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_sees_duplicate_written_elsewhere() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("buyers.json");
        let first = BuyerRepository::new(path.clone());
        let second = BuyerRepository::new(path);

        let a = buyer("Asha Rao");
        first.insert(a.clone()).unwrap();
        let err = second.insert(a).unwrap_err();
        assert!(matches!(err, LeadsError::Duplicate { .. }));
    }

    #[test]
    fn test_scan_orders_and_pages() {
        let (_temp, repo) = create_test_repo();
        let now = Utc::now();
        for i in 0..5 {
            let mut b = buyer(&format!("Buyer {}", i));
            b.updated_at = now - Duration::minutes(10 - i);
            repo.insert(b).unwrap();
        }

        let (all, total) = repo.scan(&BuyerFilter::default(), None).unwrap();
        assert_eq!(total, 5);
        assert_eq!(all[0].full_name, "Buyer 4");
        assert_eq!(all[4].full_name, "Buyer 0");

        let (page, total) = repo
            .scan(&BuyerFilter::default(), Some(Page::new(2, 2)))
            .unwrap();
        assert_eq!(total, 5);
        let names: Vec<_> = page.iter().map(|b| b.full_name.as_str()).collect();
        assert_eq!(names, vec!["Buyer 2", "Buyer 1"]);
    }
}
