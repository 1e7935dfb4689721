//! buyer-leads - buyer lead tracking with an audited mutation pipeline
//!
//! Real-estate buyer leads are created and edited through a single pipeline
//! that validates input, authenticates the caller, checks ownership, persists
//! the record and appends a field-level diff to the buyer's history.
//!
//! # Architecture
//!
//! - `config`: Paths and settings
//! - `error`: Error type and its status mapping
//! - `models`: Buyers, their closed value sets, and users
//! - `validation`: Raw input to normalized buyer data
//! - `auth`: Tokens, principals and the ownership guard
//! - `audit`: Field diffs and the append-only history log
//! - `storage`: JSON file storage behind the `LeadStore` seam
//! - `services`: The mutation pipeline, queries and user accounts
//! - `export`: CSV, JSON and YAML export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use buyer_leads::config::{LeadsPaths, Settings};
//!
//! let paths = LeadsPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod validation;

pub use error::{LeadsError, LeadsResult};
