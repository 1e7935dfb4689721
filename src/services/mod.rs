//! Service layer for buyer-leads
//!
//! The service layer provides business logic on top of the storage layer:
//! the buyer mutation pipeline, read-side queries, and user accounts.

pub mod lead;
pub mod query;
pub mod user;

pub use lead::{LeadMutationService, MutationStage};
pub use query::{BuyerPage, QueryService};
pub use user::{Session, SignupRequest, UserService};
