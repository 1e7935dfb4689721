//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LeadsError;
use crate::models::{User, UserId};

use super::file_io::{read_json, with_exclusive_lock, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), LeadsError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    pub fn get(&self, id: &UserId) -> Result<Option<User>, LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(id).cloned())
    }

    /// Get a user by username (case-insensitive)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let wanted = User::normalize(username);
        Ok(data
            .values()
            .find(|u| User::normalize(&u.username) == wanted)
            .cloned())
    }

    /// Check if an email is already registered (case-insensitive)
    pub fn email_exists(&self, email: &str) -> Result<bool, LeadsError> {
        let data = self
            .data
            .read()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let wanted = User::normalize(email);
        Ok(data.values().any(|u| User::normalize(&u.email) == wanted))
    }

    /// Store a new user and save
    ///
    /// Runs under the file lock against the current file contents, so a user
    /// signed up by another process is neither dropped nor duplicated.
    pub fn insert(&self, user: User) -> Result<(), LeadsError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LeadsError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        with_exclusive_lock(&self.path, || {
            let file_data: UserData = read_json(&self.path)?;
            let mut fresh: HashMap<UserId, User> =
                file_data.users.into_iter().map(|u| (u.id, u)).collect();

            let username = User::normalize(&user.username);
            let email = User::normalize(&user.email);
            if let Some(taken) = fresh.values().find(|u| {
                User::normalize(&u.username) == username || User::normalize(&u.email) == email
            }) {
                let identifier = if User::normalize(&taken.username) == username {
                    user.username.clone()
                } else {
                    user.email.clone()
                };
                return Err(LeadsError::Duplicate {
                    entity_type: "User",
                    identifier,
                });
            }
            fresh.insert(user.id, user);

            let mut users: Vec<User> = fresh.values().cloned().collect();
            users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            write_json_atomic(&self.path, &UserData { users })?;

            *data = fresh;
            Ok(())
        })
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
    use crate::models::Role;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_insert_and_lookup() {
        let (_temp, repo) = create_test_repo();
        repo.load().unwrap();

        let user = User::new("Asha", "asha@example.com", "Asha K", "hash", Role::Admin);
        let id = user.id;
        repo.insert(user).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.get(&id).unwrap().unwrap().username, "Asha");
        assert!(repo.get_by_username("asha").unwrap().is_some());
        assert!(repo.email_exists("ASHA@example.com").unwrap());
        assert!(!repo.email_exists("bo@example.com").unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo();
        repo.insert(User::new("bo", "bo@example.com", "Bo", "hash", Role::Standard))
            .unwrap();

        let repo2 = UserRepository::new(temp.path().join("users.json"));
        repo2.load().unwrap();
        assert!(repo2.get_by_username("bo").unwrap().is_some());
    }

    #[test]
    fn test_second_writer_keeps_users_and_rejects_taken_names() {
        let (temp, first) = create_test_repo();
        let second = UserRepository::new(temp.path().join("users.json"));
        first.load().unwrap();
        second.load().unwrap();

        first
            .insert(User::new("asha", "asha@example.com", "Asha", "hash", Role::Standard))
            .unwrap();
        second
            .insert(User::new("ravi", "ravi@example.com", "Ravi", "hash", Role::Standard))
            .unwrap();
        assert_eq!(second.count().unwrap(), 2);

        let err = first
            .insert(User::new("RAVI", "other@example.com", "Ravi", "hash", Role::Standard))
            .unwrap_err();
        assert!(matches!(err, LeadsError::Duplicate { .. }));
    }
}
