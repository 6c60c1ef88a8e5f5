//! Account and verification token ports over the in-memory tables.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository, VerificationTokenRepository};
use crate::domain::{BookId, NewUser, Role, User, UserId, VerificationToken};

use super::MemoryStore;

type Result<T> = std::result::Result<T, UserPersistenceError>;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.get(id.get()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::query("unique constraint violated"));
        }
        Ok(state.users.insert_with(|id| User {
            id: UserId::new(id),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            phone_number: user.phone_number.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            admin_created_by: None,
            favorite_books: Vec::new(),
        }))
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.users.values().cloned().collect())
    }

    async fn set_active(&self, id: UserId, active: bool) -> Result<()> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if let Some(user) = state.users.get_mut(id.get()) {
            user.is_active = active;
        }
        Ok(())
    }

    async fn set_role(
        &self,
        id: UserId,
        role: Role,
        admin_created_by: Option<UserId>,
    ) -> Result<()> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if let Some(user) = state.users.get_mut(id.get()) {
            user.role = role;
            user.admin_created_by = admin_created_by;
        }
        Ok(())
    }

    async fn add_favorite(&self, id: UserId, book_id: BookId) -> Result<bool> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if state.books.get(book_id.get()).is_none() {
            return Err(UserPersistenceError::query("unknown book reference"));
        }
        let Some(user) = state.users.get_mut(id.get()) else {
            return Err(UserPersistenceError::query("unknown user reference"));
        };
        if user.favorite_books.contains(&book_id) {
            return Ok(false);
        }
        user.favorite_books.push(book_id);
        user.favorite_books.sort_unstable();
        Ok(true)
    }

    async fn remove_favorite(&self, id: UserId, book_id: BookId) -> Result<()> {
        let mut state = self.lock(UserPersistenceError::query)?;
        if let Some(user) = state.users.get_mut(id.get()) {
            user.favorite_books.retain(|favorite| *favorite != book_id);
        }
        Ok(())
    }
}

#[async_trait]
impl VerificationTokenRepository for MemoryStore {
    async fn save(&self, token: &VerificationToken) -> Result<()> {
        let mut state = self.lock(UserPersistenceError::query)?;
        state.tokens.insert(token.token, token.clone());
        Ok(())
    }

    async fn find(&self, token: Uuid) -> Result<Option<VerificationToken>> {
        let state = self.lock(UserPersistenceError::query)?;
        Ok(state.tokens.get(&token).cloned())
    }

    async fn delete(&self, token: Uuid) -> Result<()> {
        let mut state = self.lock(UserPersistenceError::query)?;
        state.tokens.remove(&token);
        Ok(())
    }
}
