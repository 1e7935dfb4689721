//! Core data models for buyer-leads
//!
//! Buyer leads, the closed value sets their fields draw from, and the users
//! who own them.

pub mod buyer;
pub mod choices;
pub mod ids;
pub mod user;

pub use buyer::{format_amount, Buyer, BuyerField, BuyerInput};
pub use choices::{Bhk, BuyerStatus, City, PropertyType, Purpose, Source, Timeline};
pub use ids::{BuyerId, HistoryId, UserId};
pub use user::{Role, User};
