//! bcrypt implementation of the [`PasswordHasher`] port.
//!
//! Stored hashes use the modular crypt format (`$2b$<cost>$<salt+digest>`),
//! so the cost travels with each hash and older hashes keep verifying after
//! the configured cost is raised.

use bcrypt::BcryptError;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// bcrypt password hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using `cost` rounds (log2). bcrypt accepts 4 to 31.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

impl From<BcryptError> for PasswordHashError {
    fn from(error: BcryptError) -> Self {
        match error {
            BcryptError::InvalidHash(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidCost(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_) => Self::malformed_hash(error.to_string()),
            other => Self::hashing(other.to_string()),
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        Ok(bcrypt::verify(password, stored_hash)?)
    }
}
