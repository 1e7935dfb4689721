//! Signed login tokens (HS256 JWT)
//!
//! Claims carry `userId`, `username` and `role`, plus the usual `iat`/`exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;
use crate::error::{LeadsError, LeadsResult};
use crate::models::{Role, User};

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Verifies an opaque credential and yields its claims
///
/// This is the seam between the auth context and whatever signs tokens.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, JwtError>;
}

/// Issues and verifies HS256 tokens with a shared secret
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    ttl_seconds: i64,
}

impl JwtService {
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// Build from settings: signing secret and token lifetime
    ///
    /// A lifetime that is not positive, or too large to add to a timestamp,
    /// is a configuration error.
    pub fn from_settings(settings: &Settings) -> LeadsResult<Self> {
        let hours = settings.token_ttl_hours;
        let ttl_seconds = hours
            .checked_mul(3600)
            .filter(|secs| *secs > 0 && expiry_after(Utc::now(), *secs).is_some())
            .ok_or_else(|| {
                LeadsError::Config(format!(
                    "token_ttl_hours must be a positive number of hours, got {}",
                    hours
                ))
            })?;
        Ok(Self::new(settings.effective_secret()?, ttl_seconds))
    }

    /// Sign a token for a user
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = expiry_after(now, self.ttl_seconds).ok_or_else(|| {
            JwtError::CreationError(format!("token lifetime out of range: {}s", self.ttl_seconds))
        })?;
        let claims = Claims {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp,
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }
}

/// Unix expiry `ttl_seconds` after `now`, if representable
fn expiry_after(now: DateTime<Utc>, ttl_seconds: i64) -> Option<i64> {
    Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .map(|exp| exp.timestamp())
}

impl CredentialVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| JwtError::ValidationError(e.to_string()))
    }
}

impl From<JwtError> for LeadsError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreationError(msg) => LeadsError::Crypto(msg),
            JwtError::ValidationError(_) => LeadsError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new("asha", "asha@example.com", "Asha", "hash", role)
    }

    #[test]
    fn test_issue_and_verify() {
        let jwt = JwtService::new("test-secret", 3600);
        let user = user(Role::Admin);
        let token = jwt.issue(&user).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.user_id, user.id.to_string());
        assert_eq!(claims.username, "asha");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("secret-a", 3600).issue(&user(Role::Standard)).unwrap();
        assert!(JwtService::new("secret-b", 3600).verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtService::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: "u1".into(),
            username: "asha".into(),
            role: Role::Standard,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jwt.sign(&claims).unwrap();
        assert!(jwt.verify(&token).is_err());
    }

    #[test]
    fn test_claims_use_camel_case() {
        let claims = Claims {
            user_id: "u1".into(),
            username: "asha".into(),
            role: Role::Standard,
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["role"], "standard");
    }

    fn settings_with_ttl(hours: i64) -> Settings {
        Settings {
            jwt_secret: "settings-secret".into(),
            token_ttl_hours: hours,
            ..Settings::default()
        }
    }

    #[test]
    fn test_from_settings_uses_ttl_hours() {
        let jwt = JwtService::from_settings(&settings_with_ttl(2)).unwrap();
        let token = jwt.issue(&user(Role::Standard)).unwrap();
        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7200);
    }

    #[test]
    fn test_out_of_range_ttl_is_config_error() {
        for hours in [i64::MAX, i64::MAX / 3600, 0, -5] {
            let err = JwtService::from_settings(&settings_with_ttl(hours))
                .err()
                .unwrap_or_else(|| panic!("ttl {} accepted", hours));
            assert!(matches!(err, LeadsError::Config(_)), "ttl {}: {:?}", hours, err);
        }
    }

    #[test]
    fn test_issue_with_unrepresentable_ttl_fails_cleanly() {
        let jwt = JwtService::new("test-secret", i64::MAX);
        let err = jwt.issue(&user(Role::Standard)).unwrap_err();
        assert!(matches!(err, JwtError::CreationError(_)));
    }
}
