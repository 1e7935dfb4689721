//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod buyer;
pub mod session;
pub mod user;

pub use buyer::{handle_buyer_command, BuyerCommands, BuyerFields, ExportFormat, FilterArgs};
pub use session::{clear_token, resolve_token, save_token};
pub use user::{handle_user_command, UserCommands};
