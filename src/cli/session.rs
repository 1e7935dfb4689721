//! Saved login session
//!
//! `leads user login` stores the issued token in the data directory so later
//! commands can run without `--token`.

use std::fs;

use crate::config::LeadsPaths;
use crate::error::{LeadsError, LeadsResult};

/// Pick the credential for a command
///
/// An explicit `--token` (or `LEADS_TOKEN`) wins over the saved session.
pub fn resolve_token(paths: &LeadsPaths, explicit: Option<&str>) -> Option<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(token.to_string());
    }

    let contents = fs::read_to_string(paths.session_file()).ok()?;
    let token = contents.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Remember a token for later commands
pub fn save_token(paths: &LeadsPaths, token: &str) -> LeadsResult<()> {
    paths.ensure_directories()?;
    fs::write(paths.session_file(), token)
        .map_err(|e| LeadsError::Storage(format!("Failed to save session: {}", e)))
}

/// Forget the saved token; returns whether one existed
pub fn clear_token(paths: &LeadsPaths) -> LeadsResult<bool> {
    let path = paths.session_file();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)
        .map_err(|e| LeadsError::Storage(format!("Failed to remove session: {}", e)))?;
    Ok(true)
}
