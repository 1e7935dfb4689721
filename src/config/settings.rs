//! User settings for buyer-leads
//!
//! Holds the token signing secret, token lifetime, list page size and logging
//! preferences. Settings are loaded once at startup and handed to the parts
//! that need them; nothing reads them from global state.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use serde::{Deserialize, Serialize};

use super::paths::LeadsPaths;
use crate::error::LeadsError;

/// Environment variable that overrides the stored signing secret
pub const JWT_SECRET_ENV: &str = "LEADS_JWT_SECRET";

/// Settings for buyer-leads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Secret used to sign login tokens (HS256)
    #[serde(default)]
    pub jwt_secret: String,

    /// How long a login token stays valid
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Rows per page in `buyer list`
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Default log filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of plain text
    #[serde(default)]
    pub log_json: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_page_size() -> usize {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            page_size: default_page_size(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LeadsPaths) -> Result<Self, LeadsError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                LeadsError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LeadsError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - `init` decides when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LeadsPaths) -> Result<(), LeadsError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            LeadsError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LeadsError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Generate a signing secret if none is stored yet
    ///
    /// Returns true when a new secret was generated.
    pub fn ensure_secret(&mut self) -> bool {
        if !self.jwt_secret.is_empty() {
            return false;
        }
        let first = SaltString::generate(&mut OsRng);
        let second = SaltString::generate(&mut OsRng);
        self.jwt_secret = format!("{}{}", first.as_str(), second.as_str());
        true
    }

    /// Secret used for signing and verifying tokens
    ///
    /// `LEADS_JWT_SECRET` takes precedence over the stored value.
    pub fn effective_secret(&self) -> Result<String, LeadsError> {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            if !secret.is_empty() {
                return Ok(secret);
            }
        }

        if self.jwt_secret.is_empty() {
            return Err(LeadsError::Config(format!(
                "No token signing secret configured. Run 'leads init' or set {}",
                JWT_SECRET_ENV
            )));
        }

        Ok(self.jwt_secret.clone())
    }
}
