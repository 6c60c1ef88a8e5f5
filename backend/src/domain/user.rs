//! Library account model.
//!
//! Accounts are created inactive with [`Role::User`] and become active once
//! the email address is verified. Email addresses are stored lower-cased.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{BookId, UserId};

/// Validation errors raised while building account inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// A required field was blank.
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    /// A field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// The email address does not look like `local@domain`.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Access role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// The other role; used by the admin role toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::User => Self::Admin,
            Self::Admin => Self::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Self::User),
            "ROLE_ADMIN" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Lower-cased email address with a minimal shape check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    const MAX: usize = 254;

    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::Blank { field: "email" });
        }
        if normalized.chars().count() > Self::MAX {
            return Err(UserValidationError::TooLong {
                field: "email",
                max: Self::MAX,
            });
        }
        match normalized.split_once('@') {
            Some((local, domain))
                if !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !normalized.contains(char::is_whitespace) =>
            {
                Ok(Self(normalized))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Admin that last claimed authority over this account's role.
    pub admin_created_by: Option<UserId>,
    pub favorite_books: Vec<BookId>,
}

impl User {
    /// Identity handed to services for the current request.
    pub fn caller(&self) -> Caller {
        Caller {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Resolved identity of the requesting user.
///
/// Passed explicitly into every service call that depends on who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    firstname: String,
    lastname: String,
    phone_number: String,
    email: Email,
    password: Zeroizing<String>,
}

impl Registration {
    const NAME_MAX: usize = 50;
    const PHONE_MAX: usize = 20;

    pub fn try_new(
        firstname: &str,
        lastname: &str,
        phone_number: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let firstname = bounded("firstname", firstname, Self::NAME_MAX)?;
        let lastname = bounded("lastname", lastname, Self::NAME_MAX)?;
        let phone_number = bounded("phone_number", phone_number, Self::PHONE_MAX)?;
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(UserValidationError::Blank { field: "password" });
        }
        Ok(Self {
            firstname,
            lastname,
            phone_number,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn bounded(field: &'static str, raw: &str, max: usize) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(UserValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Account row to insert; identifiers are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
