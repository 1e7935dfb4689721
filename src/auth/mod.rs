//! Authentication and authorization
//!
//! [`AuthContext`] turns a presented token into a [`Principal`];
//! [`AuthorizationGuard`] decides what that principal may do.

pub mod context;
pub mod guard;
pub mod password;
pub mod principal;
pub mod token;

pub use context::{AuthContext, AuthError};
pub use guard::{canonical_id, Action, AuthorizationGuard, Decision, DenyReason};
pub use password::{hash_password, verify_password};
pub use principal::Principal;
pub use token::{Claims, CredentialVerifier, JwtError, JwtService};
