//! User service
//!
//! Signup and login. Both hand back a signed token that later commands
//! present as their credential.

use email_address::EmailAddress;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, JwtService, Principal};
use crate::error::{LeadsError, LeadsResult};
use crate::models::{Role, User, UserId};
use crate::storage::Storage;

/// Details for a new account
#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    /// Only honored for the very first account
    pub admin: bool,
}

/// A user together with a freshly issued token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct UserService<'a> {
    storage: &'a Storage,
    jwt: &'a JwtService,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage, jwt: &'a JwtService) -> Self {
        Self { storage, jwt }
    }

    /// Register a user and log them in
    pub fn signup(&self, request: SignupRequest) -> LeadsResult<Session> {
        let username = request.username.trim();
        let email = request.email.trim();
        let name = request.name.trim();

        let missing: Vec<&str> = [
            ("username", username.is_empty()),
            ("password", request.password.is_empty()),
            ("email", email.is_empty()),
            ("name", name.is_empty()),
        ]
        .iter()
        .filter(|(_, empty)| *empty)
        .map(|(field, _)| *field)
        .collect();
        if !missing.is_empty() {
            return Err(LeadsError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !EmailAddress::is_valid(email) {
            return Err(LeadsError::Validation(format!("Invalid email address: {}", email)));
        }

        if self.storage.users.get_by_username(username)?.is_some() {
            return Err(LeadsError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }
        if self.storage.users.email_exists(email)? {
            return Err(LeadsError::Duplicate {
                entity_type: "User",
                identifier: email.to_string(),
            });
        }

        let role = if request.admin {
            if self.storage.users.count()? > 0 {
                return Err(LeadsError::Forbidden(
                    "only the first account may be created as admin".into(),
                ));
            }
            Role::Admin
        } else {
            Role::Standard
        };

        let hash = hash_password(&request.password)?;
        let user = User::new(username, email, name, hash, role);
        self.storage.users.insert(user.clone())?;
        info!(user_id = %user.id, username = %user.username, role = %user.role, "user signed up");

        let token = self.jwt.issue(&user)?;
        Ok(Session { user, token })
    }

    /// Check a username and password and issue a token
    ///
    /// Unknown users and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &str) -> LeadsResult<Session> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(LeadsError::Validation(
                "Username and password are required".into(),
            ));
        }

        let user = match self.storage.users.get_by_username(username)? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!(username = username.trim(), "login failed");
                return Err(LeadsError::Unauthenticated);
            }
        };

        info!(user_id = %user.id, "user logged in");
        let token = self.jwt.issue(&user)?;
        Ok(Session { user, token })
    }

    /// The stored account behind a principal
    pub fn profile(&self, principal: &Principal) -> LeadsResult<User> {
        let id: UserId = principal
            .id
            .parse()
            .map_err(|_| LeadsError::user_not_found(&principal.id))?;
        self.storage
            .users
            .get(&id)?
            .ok_or_else(|| LeadsError::user_not_found(&principal.id))
    }
}
