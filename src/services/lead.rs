//! Buyer mutation pipeline
//!
//! Every create and update runs the same fixed sequence:
//!
//! ```text
//! Received -> Validated -> Authorized -> Persisted -> Audited -> Complete
//! ```
//!
//! Failures leave the pipeline early as `RejectedInput`, `Unauthenticated`,
//! `Denied`, `NotFound`, `PersistenceFailed` or `AuditFailed`. Nothing touches
//! storage before `Authorized`, and a stored change is only reported complete
//! once its history entry is written (or the diff was empty).

use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

use crate::audit::{diff, HistoryEntry};
use crate::auth::{Action, AuthContext, AuthorizationGuard, Decision, DenyReason, Principal};
use crate::error::{LeadsError, LeadsResult};
use crate::models::{Buyer, BuyerId};
use crate::storage::LeadStore;
use crate::validation;

/// Where a mutation is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    Received,
    Validated,
    Authorized,
    Persisted,
    Audited,
    Complete,
    RejectedInput,
    Unauthenticated,
    Denied,
    NotFound,
    PersistenceFailed,
    AuditFailed,
}

impl MutationStage {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            Self::Received | Self::Validated | Self::Authorized | Self::Persisted | Self::Audited
        )
    }
}

impl fmt::Display for MutationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Authorized => "authorized",
            Self::Persisted => "persisted",
            Self::Audited => "audited",
            Self::Complete => "complete",
            Self::RejectedInput => "rejected_input",
            Self::Unauthenticated => "unauthenticated",
            Self::Denied => "denied",
            Self::NotFound => "not_found",
            Self::PersistenceFailed => "persistence_failed",
            Self::AuditFailed => "audit_failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Update,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Tracks one run through the pipeline and logs each transition
struct Pipeline {
    operation: Operation,
    stage: MutationStage,
}

impl Pipeline {
    fn start(operation: Operation) -> Self {
        debug!(operation = operation.as_str(), stage = %MutationStage::Received, "mutation received");
        Self {
            operation,
            stage: MutationStage::Received,
        }
    }

    fn advance(&mut self, next: MutationStage) {
        debug!(
            operation = self.operation.as_str(),
            from = %self.stage,
            to = %next,
            "mutation stage"
        );
        self.stage = next;
    }

    /// Move to a terminal failure stage and hand back the error
    fn fail(&mut self, stage: MutationStage, err: LeadsError) -> LeadsError {
        self.advance(stage);
        err
    }
}

/// Creates and updates buyers with validation, authorization and history
pub struct LeadMutationService<'a> {
    store: &'a dyn LeadStore,
    auth: &'a AuthContext,
    guard: AuthorizationGuard,
}

impl<'a> LeadMutationService<'a> {
    pub fn new(store: &'a dyn LeadStore, auth: &'a AuthContext) -> Self {
        Self {
            store,
            auth,
            guard: AuthorizationGuard::new(),
        }
    }

    /// Create a buyer from a raw JSON body
    ///
    /// The new record is owned by the authenticated principal whatever the
    /// body says.
    pub fn create(&self, body: &Value, credential: Option<&str>) -> LeadsResult<Buyer> {
        let mut run = Pipeline::start(Operation::Create);

        let input = validation::validate(body)
            .map_err(|errors| run.fail(MutationStage::RejectedInput, errors.into()))?;
        run.advance(MutationStage::Validated);

        let principal = self.principal(&mut run, credential)?;
        self.check(&mut run, &principal, Action::Create, None, "")?;
        run.advance(MutationStage::Authorized);

        let buyer = Buyer::from_input(input, principal.id.clone());
        self.store
            .insert_buyer(&buyer)
            .map_err(|e| run.fail(MutationStage::PersistenceFailed, e))?;
        run.advance(MutationStage::Persisted);

        self.record(&mut run, &principal, None, &buyer)?;

        info!(buyer_id = %buyer.id, owner = %principal.id, "buyer created");
        Ok(buyer)
    }

    /// Overwrite every editable field of buyer `id` from a raw JSON body
    ///
    /// Owners and admins only. An id that does not parse is reported the
    /// same way as one that is absent.
    pub fn update(&self, id: &str, body: &Value, credential: Option<&str>) -> LeadsResult<Buyer> {
        let mut run = Pipeline::start(Operation::Update);

        let input = validation::validate(body)
            .map_err(|errors| run.fail(MutationStage::RejectedInput, errors.into()))?;
        run.advance(MutationStage::Validated);

        let principal = self.principal(&mut run, credential)?;

        let existing = match id.parse::<BuyerId>() {
            Ok(buyer_id) => self.store.get_buyer(&buyer_id).map_err(|e| {
                run.fail(MutationStage::PersistenceFailed, LeadsError::Persistence(e.to_string()))
            })?,
            Err(_) => None,
        };
        self.check(&mut run, &principal, Action::Update, existing.as_ref(), id)?;
        let Some(existing) = existing else {
            return Err(run.fail(MutationStage::NotFound, LeadsError::buyer_not_found(id)));
        };
        run.advance(MutationStage::Authorized);

        let updated = existing.overwritten_with(input);
        self.store
            .overwrite_buyer(&updated)
            .map_err(|e| run.fail(MutationStage::PersistenceFailed, e))?;
        run.advance(MutationStage::Persisted);

        self.record(&mut run, &principal, Some(&existing), &updated)?;

        info!(buyer_id = %updated.id, by = %principal.id, "buyer updated");
        Ok(updated)
    }

    fn principal(&self, run: &mut Pipeline, credential: Option<&str>) -> LeadsResult<Principal> {
        self.auth
            .authenticate(credential)
            .map_err(|e| run.fail(MutationStage::Unauthenticated, e.into()))
    }

    fn check(
        &self,
        run: &mut Pipeline,
        principal: &Principal,
        action: Action,
        record: Option<&Buyer>,
        id: &str,
    ) -> LeadsResult<()> {
        if let Decision::Deny(reason) = self.guard.authorize(principal, action, record) {
            warn!(principal = %principal.id, buyer_id = id, reason = reason.as_str(), "mutation denied");
            let stage = match reason {
                DenyReason::NotFound => MutationStage::NotFound,
                DenyReason::Forbidden => MutationStage::Denied,
            };
            return Err(run.fail(stage, reason.into_error(id)));
        }
        Ok(())
    }

    /// Diff against the pre-mutation snapshot and append history if needed
    fn record(
        &self,
        run: &mut Pipeline,
        principal: &Principal,
        previous: Option<&Buyer>,
        next: &Buyer,
    ) -> LeadsResult<()> {
        let changes = diff(previous, next);
        if changes.is_noop() {
            debug!(buyer_id = %next.id, "no fields changed, history skipped");
            run.advance(MutationStage::Complete);
            return Ok(());
        }

        let entry = HistoryEntry::new(next.id, principal.id.clone(), changes);
        if let Err(e) = self.store.append_history(&entry) {
            warn!(buyer_id = %next.id, error = %e, "buyer saved without history entry");
            return Err(run.fail(
                MutationStage::AuditFailed,
                LeadsError::AuditWrite {
                    buyer_id: next.id.to_string(),
                    message: e.to_string(),
                },
            ));
        }
        run.advance(MutationStage::Audited);
        run.advance(MutationStage::Complete);
        Ok(())
    }
}
