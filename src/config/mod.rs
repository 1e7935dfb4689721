//! Configuration module for buyer-leads
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - Settings persistence (token secret, page size, logging)

pub mod paths;
pub mod settings;

pub use paths::LeadsPaths;
pub use settings::Settings;
