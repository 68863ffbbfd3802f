pub mod password;
pub mod verifier;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::DatabaseError;

pub use password::{Argon2PasswordEncoder, PasswordEncoder, PasswordError};
pub use verifier::CredentialVerifier;

/// Generic answer for unknown usernames and wrong passwords alike.
pub const LOGIN_FAILED: &str = "Login failed";
/// Disabled accounts get their own answer so staff know to ask an admin.
pub const ACCOUNT_DISABLED: &str = "Account is disabled";

/// Id of the signed-in employee, as stored in the session and the identity context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(i64);

impl Identity {
    pub const fn new(employee_id: i64) -> Self {
        Self(employee_id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no account with that username")]
    AccountNotFound,

    #[error("password does not match")]
    PasswordMismatch,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("account lookup failed: {0}")]
    Store(#[from] DatabaseError),
}

impl AuthError {
    /// Message shown to the client. Not-found and mismatch are deliberately
    /// indistinguishable; a disabled account is told apart.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::AccountDisabled => ACCOUNT_DISABLED,
            AuthError::AccountNotFound | AuthError::PasswordMismatch | AuthError::Store(_) => {
                LOGIN_FAILED
            }
        }
    }
}
