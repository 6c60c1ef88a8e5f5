//! Ports for account persistence and email verification tokens.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BookId, NewUser, Role, User, UserId, VerificationToken};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Lookup by lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Every account in id order.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;

    async fn set_active(&self, id: UserId, active: bool) -> Result<(), UserPersistenceError>;

    async fn set_role(
        &self,
        id: UserId,
        role: Role,
        admin_created_by: Option<UserId>,
    ) -> Result<(), UserPersistenceError>;

    /// Add a favourite book; `false` when it was already present.
    async fn add_favorite(&self, id: UserId, book_id: BookId)
    -> Result<bool, UserPersistenceError>;

    async fn remove_favorite(&self, id: UserId, book_id: BookId)
    -> Result<(), UserPersistenceError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync {
    async fn save(&self, token: &VerificationToken) -> Result<(), UserPersistenceError>;

    async fn find(&self, token: Uuid) -> Result<Option<VerificationToken>, UserPersistenceError>;

    async fn delete(&self, token: Uuid) -> Result<(), UserPersistenceError>;
}
