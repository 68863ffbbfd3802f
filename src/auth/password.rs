use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),

    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// One-way password digests stored on employee records.
pub trait PasswordEncoder: Send + Sync {
    /// Digest a plaintext password for storage.
    fn encode(&self, raw_password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored digest. Malformed digests
    /// never match.
    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool;
}

/// Salted Argon2id digests in PHC string format (`$argon2id$v=19$...`).
#[derive(Clone)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Custom cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes())
            .map_err(|e| PasswordError::Hash(e.to_string()))?;
        self.argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        match PasswordHash::new(encoded_password) {
            Ok(hash) => self.argon2.verify_password(raw_password.as_bytes(), &hash).is_ok(),
            Err(_) => false,
        }
    }
}
