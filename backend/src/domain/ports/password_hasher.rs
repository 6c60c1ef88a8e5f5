//! Port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
        /// The hashing primitive itself failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Synchronous because hashing never waits on I/O.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
