//! Turning a presented credential into a principal

use thiserror::Error;
use tracing::debug;

use super::principal::Principal;
use super::token::CredentialVerifier;
use crate::error::LeadsError;

/// The only way authentication fails, whatever the underlying cause
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    Unauthenticated,
}

impl From<AuthError> for LeadsError {
    fn from(_: AuthError) -> Self {
        LeadsError::Unauthenticated
    }
}

/// Derives principals from credentials
///
/// Holds nothing but the verifier, so the result depends only on the
/// credential presented.
pub struct AuthContext {
    verifier: Box<dyn CredentialVerifier>,
}

impl AuthContext {
    pub fn new(verifier: impl CredentialVerifier + 'static) -> Self {
        Self {
            verifier: Box::new(verifier),
        }
    }

    /// Verify a credential and return the principal it names
    ///
    /// Accepts a bare token or an `Authorization`-style `Bearer <token>`.
    /// Missing, malformed, expired and tampered credentials all yield
    /// [`AuthError::Unauthenticated`].
    pub fn authenticate(&self, credential: Option<&str>) -> Result<Principal, AuthError> {
        let token = credential
            .map(str::trim)
            .map(|c| c.strip_prefix("Bearer ").unwrap_or(c).trim())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                debug!("no credential presented");
                AuthError::Unauthenticated
            })?;

        let claims = self.verifier.verify(token).map_err(|e| {
            debug!(error = %e, "credential rejected");
            AuthError::Unauthenticated
        })?;

        if claims.user_id.trim().is_empty() {
            debug!("credential has an empty user id");
            return Err(AuthError::Unauthenticated);
        }

        Ok(Principal::new(claims.user_id, claims.username, claims.role))
    }
}
