//! User CLI commands
//!
//! Signup, login and the saved session.

use clap::Subcommand;

use crate::auth::{AuthContext, JwtService};
use crate::cli::session::{clear_token, save_token};
use crate::error::{LeadsError, LeadsResult};
use crate::services::{Session, SignupRequest, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user and log in
    Signup {
        /// Login name
        username: String,
        /// Contact email
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Password (prompted for when omitted)
        #[arg(short, long, env = "LEADS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Create an admin account (first user only)
        #[arg(long)]
        admin: bool,
    },
    /// Log in and save the session token
    Login {
        /// Login name
        username: String,
        /// Password (prompted for when omitted)
        #[arg(short, long, env = "LEADS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the saved session token
    Logout,
    /// Show the logged-in user
    Whoami,
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    jwt: &JwtService,
    credential: Option<&str>,
    cmd: UserCommands,
) -> LeadsResult<()> {
    let service = UserService::new(storage, jwt);

    match cmd {
        UserCommands::Signup {
            username,
            email,
            name,
            password,
            admin,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            let session = service.signup(SignupRequest {
                username,
                password,
                email,
                name,
                admin,
            })?;
            remember(storage, &session)?;
            println!(
                "Created user '{}' ({}) and logged in.",
                session.user.username, session.user.role
            );
        }
        UserCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password: ")?,
            };
            let session = service.login(&username, &password)?;
            remember(storage, &session)?;
            println!("Logged in as '{}'.", session.user.username);
        }
        UserCommands::Logout => {
            if clear_token(storage.paths())? {
                println!("Logged out.");
            } else {
                println!("No saved session.");
            }
        }
        UserCommands::Whoami => {
            let auth = AuthContext::new(jwt.clone());
            let principal = auth.authenticate(credential)?;
            let user = service.profile(&principal)?;

            println!("User: {}", user.username);
            println!("  ID:     {}", user.id);
            println!("  Name:   {}", user.name);
            println!("  Email:  {}", user.email);
            println!("  Role:   {}", user.role);
            println!("  Since:  {}", user.created_at.format("%Y-%m-%d"));
        }
    }

    Ok(())
}

fn remember(storage: &Storage, session: &Session) -> LeadsResult<()> {
    save_token(storage.paths(), &session.token)
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> LeadsResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| LeadsError::Validation(format!("Failed to read password: {}", e)))
}
