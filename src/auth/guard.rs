//! The single authorization rule set for buyer mutations
//!
//! Every mutation path asks [`AuthorizationGuard::authorize`]; no command
//! performs its own role checks.

use std::fmt;

use super::principal::Principal;
use crate::error::LeadsError;
use crate::models::Buyer;

/// What the principal wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Read,
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Forbidden,
    NotFound,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
        }
    }

    /// The error a caller sees for this denial on `buyer_id`
    pub fn into_error(self, buyer_id: &str) -> LeadsError {
        match self {
            Self::NotFound => LeadsError::buyer_not_found(buyer_id),
            Self::Forbidden => LeadsError::Forbidden(format!(
                "you may only edit buyers you created ({})",
                buyer_id
            )),
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Turn a decision about `buyer_id` into a result
    pub fn into_result(self, buyer_id: &str) -> Result<(), LeadsError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason.into_error(buyer_id)),
        }
    }
}

/// Canonical string form of an identifier for ownership comparison
///
/// Ids reach the guard from token claims and from stored records; both are
/// compared after trimming and lowercasing.
pub fn canonical_id(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Decides whether a principal may act on a record
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    pub fn new() -> Self {
        Self
    }

    /// Decide on `action`, given the located record for updates
    ///
    /// An update whose record could not be found is denied with
    /// [`DenyReason::NotFound`] before ownership is considered.
    pub fn authorize(&self, principal: &Principal, action: Action, record: Option<&Buyer>) -> Decision {
        match action {
            Action::Create | Action::Read => Decision::Allow,
            Action::Update => {
                let Some(record) = record else {
                    return Decision::Deny(DenyReason::NotFound);
                };
                if principal.is_admin()
                    || canonical_id(&principal.id) == canonical_id(&record.owner_id)
                {
                    Decision::Allow
                } else {
                    Decision::Deny(DenyReason::Forbidden)
                }
            }
        }
    }
}
