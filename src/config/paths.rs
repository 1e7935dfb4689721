//! Path management for buyer-leads
//!
//! ## Path Resolution Order
//!
//! 1. `LEADS_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `buyer-leads` as reported by
//!    `directories::ProjectDirs` (`~/.config/buyer-leads` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LeadsError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "LEADS_DATA_DIR";

/// Manages all paths used by buyer-leads
#[derive(Debug, Clone)]
pub struct LeadsPaths {
    /// Base directory for all buyer-leads data
    base_dir: PathBuf,
}

impl LeadsPaths {
    /// Create a new LeadsPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, LeadsError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create LeadsPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding buyer, user and history data
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the stored login token
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.token")
    }

    pub fn buyers_file(&self) -> PathBuf {
        self.data_dir().join("buyers.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Get the path to the append-only buyer history log
    pub fn history_file(&self) -> PathBuf {
        self.data_dir().join("buyer_history.jsonl")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), LeadsError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LeadsError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LeadsError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if buyer-leads has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LeadsError> {
    ProjectDirs::from("", "", "buyer-leads")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| LeadsError::Config("Could not determine a home directory".into()))
}
