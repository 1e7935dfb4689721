//! Display formatting for terminal output
//!
//! Buyer tables, buyer detail views and change history.

pub mod buyer;
pub mod history;

pub use buyer::{format_buyer_details, format_buyer_page};
pub use history::format_history;
