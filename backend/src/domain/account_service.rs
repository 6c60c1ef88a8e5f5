//! Account lifecycle: registration, email verification, login, admin
//! moderation and favourites.
//!
//! New accounts are inactive until the emailed verification link is
//! followed. Inactive accounts cannot log in or act through a session.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AccountCommand, BlockOutcome, BookRepository, LoginService, NotificationSender,
    PasswordHasher, UserRepository, UsersQuery, VerificationTokenRepository,
};
use crate::domain::repository_errors::{map_catalogue_error, map_hash_error, map_user_error};
use crate::domain::{
    BookId, Caller, Email, Error, LoginCredentials, NewUser, Registration, Role, User, UserId,
    VerificationToken,
};

/// Subject of the registration email.
pub const VERIFICATION_SUBJECT: &str = "Email verification";
/// Subject and body of the notice sent to a blocked account.
pub const BLOCKED_SUBJECT: &str = "Attention!!!";
pub const BLOCKED_MESSAGE: &str = "Your account is blocked!";

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("User with id: {id} not found!"))
}

fn require_admin(caller: &Caller) -> Result<(), Error> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("Access denied"))
    }
}

/// Port bundle required by the account service.
pub struct AccountPorts {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn VerificationTokenRepository>,
    pub books: Arc<dyn BookRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub notifier: Arc<dyn NotificationSender>,
}

/// Account service implementing [`AccountCommand`], [`LoginService`] and
/// [`UsersQuery`].
pub struct AccountService {
    ports: AccountPorts,
    clock: Arc<dyn Clock>,
    public_base_url: String,
}

impl AccountService {
    /// `public_base_url` prefixes the verification link sent by email.
    pub fn new(
        ports: AccountPorts,
        clock: Arc<dyn Clock>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            ports,
            clock,
            public_base_url: public_base_url.into(),
        }
    }

    fn verification_link(&self, token: Uuid) -> String {
        format!(
            "{}/users/verify_email?token={token}",
            self.public_base_url.trim_end_matches('/')
        )
    }

    async fn existing_user(&self, id: UserId) -> Result<User, Error> {
        self.ports
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Make sure an active admin account exists for `email`.
    ///
    /// An existing account is promoted and activated; its password is left
    /// unchanged.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<UserId, Error> {
        let email = Email::parse(email)
            .map_err(|err| Error::invalid_request(format!("invalid admin email: {err}")))?;
        if password.is_empty() {
            return Err(Error::invalid_request("admin password must not be empty"));
        }
        let users = &self.ports.users;
        if let Some(user) = users
            .find_by_email(email.as_ref())
            .await
            .map_err(map_user_error)?
        {
            if user.role != Role::Admin {
                users
                    .set_role(user.id, Role::Admin, user.admin_created_by)
                    .await
                    .map_err(map_user_error)?;
            }
            if !user.is_active {
                users
                    .set_active(user.id, true)
                    .await
                    .map_err(map_user_error)?;
            }
            return Ok(user.id);
        }

        let password_hash = self.ports.hasher.hash(password).map_err(map_hash_error)?;
        let admin = NewUser {
            firstname: "Library".to_owned(),
            lastname: "Administrator".to_owned(),
            phone_number: String::new(),
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
            is_active: true,
            created_at: self.clock.utc(),
        };
        let user = users.insert(&admin).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "bootstrap admin created");
        Ok(user.id)
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let email = registration.email().as_ref();
        if self
            .ports
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "User with email: {email} already exists!"
            )));
        }

        let password_hash = self
            .ports
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let now = self.clock.utc();
        let new_user = NewUser {
            firstname: registration.firstname().to_owned(),
            lastname: registration.lastname().to_owned(),
            phone_number: registration.phone_number().to_owned(),
            email: email.to_owned(),
            password_hash,
            role: Role::User,
            is_active: false,
            created_at: now,
        };
        let user = self
            .ports
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_error)?;

        let token = VerificationToken::issue(user.id, now);
        self.ports
            .tokens
            .save(&token)
            .await
            .map_err(map_user_error)?;
        let message = format!(
            "To confirm your email address, follow the link: {}",
            self.verification_link(token.token)
        );
        self.ports
            .notifier
            .send_email_notification(email, VERIFICATION_SUBJECT, &message)
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn verify_email(&self, token: Uuid) -> Result<(), Error> {
        let tokens = &self.ports.tokens;
        let stored = tokens
            .find(token)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("Invalid verification token"))?;
        if stored.is_expired(self.clock.utc()) {
            tokens.delete(token).await.map_err(map_user_error)?;
            return Err(Error::invalid_request("Token already expired"));
        }

        self.ports
            .users
            .set_active(stored.user_id, true)
            .await
            .map_err(map_user_error)?;
        tokens.delete(token).await.map_err(map_user_error)?;
        info!(user_id = %stored.user_id, "email verified");
        Ok(())
    }

    async fn block_user(&self, caller: &Caller, id: UserId) -> Result<BlockOutcome, Error> {
        require_admin(caller)?;
        let user = self.existing_user(id).await?;
        if user.role == Role::Admin {
            return Err(Error::forbidden("An administrator cannot be blocked"));
        }

        let active = !user.is_active;
        self.ports
            .users
            .set_active(id, active)
            .await
            .map_err(map_user_error)?;
        if active {
            info!(user_id = %id, admin_id = %caller.id, "user unblocked");
            return Ok(BlockOutcome::Unblocked);
        }

        info!(user_id = %id, admin_id = %caller.id, "user blocked");
        // The block is already stored, so a failed notice is not an error.
        if let Err(error) = self
            .ports
            .notifier
            .send_email_notification(&user.email, BLOCKED_SUBJECT, BLOCKED_MESSAGE)
            .await
        {
            warn!(user_id = %id, error = %error, "block notice not delivered");
        }
        Ok(BlockOutcome::Blocked)
    }

    async fn edit_role(&self, caller: &Caller, id: UserId) -> Result<Role, Error> {
        require_admin(caller)?;
        let user = self.existing_user(id).await?;
        let owner = user.admin_created_by.unwrap_or(caller.id);
        if owner != caller.id {
            return Err(Error::forbidden(
                "Only the administrator who assigned this role can change it",
            ));
        }

        let role = user.role.toggled();
        self.ports
            .users
            .set_role(id, role, Some(owner))
            .await
            .map_err(map_user_error)?;
        info!(user_id = %id, admin_id = %caller.id, role = %role, "role changed");
        Ok(role)
    }

    async fn add_favorite(&self, caller: &Caller, book_id: BookId) -> Result<(), Error> {
        self.ports
            .books
            .find_by_id(book_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("Book with id: {book_id} not found!")))?;
        let added = self
            .ports
            .users
            .add_favorite(caller.id, book_id)
            .await
            .map_err(map_user_error)?;
        if !added {
            return Err(Error::conflict("The book is already in favorites!"));
        }
        Ok(())
    }

    async fn remove_favorite(&self, caller: &Caller, book_id: BookId) -> Result<(), Error> {
        self.ports
            .users
            .remove_favorite(caller.id, book_id)
            .await
            .map_err(map_user_error)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .ports
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let valid = self
            .ports
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hash_error)?;
        if !valid {
            return Err(Error::unauthorized("invalid credentials"));
        }
        if !user.is_active {
            return Err(Error::forbidden("Account is not active"));
        }
        Ok(user.id)
    }
}

#[async_trait]
impl UsersQuery for AccountService {
    async fn caller(&self, user_id: UserId) -> Result<Caller, Error> {
        let user = self
            .ports
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if !user.is_active {
            return Err(Error::forbidden("Account is not active"));
        }
        Ok(user.caller())
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.ports.users.list_all().await.map_err(map_user_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
