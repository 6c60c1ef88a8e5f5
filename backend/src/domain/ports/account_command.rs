//! Driving ports for account lifecycle, login and user listings.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! without importing persistence, hashing or mail infrastructure, so handler
//! tests can substitute doubles.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    BookId, Caller, Error, LoginCredentials, Registration, Role, User, UserId,
};

/// Account state after an admin toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOutcome {
    Blocked,
    Unblocked,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Store an inactive account and email a verification link.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Activate the account owning `token`.
    async fn verify_email(&self, token: Uuid) -> Result<(), Error>;

    async fn block_user(&self, caller: &Caller, id: UserId) -> Result<BlockOutcome, Error>;

    /// Toggle the role of `id`, returning the new role.
    async fn edit_role(&self, caller: &Caller, id: UserId) -> Result<Role, Error>;

    async fn add_favorite(&self, caller: &Caller, book_id: BookId) -> Result<(), Error>;

    async fn remove_favorite(&self, caller: &Caller, book_id: BookId) -> Result<(), Error>;
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Domain use-case port for identity resolution and user listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Resolve a session user id into a [`Caller`]; unknown ids are
    /// unauthorised and inactive accounts are forbidden.
    async fn caller(&self, user_id: UserId) -> Result<Caller, Error>;

    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
