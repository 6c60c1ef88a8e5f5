//! Authentication primitives: login credentials and email verification tokens.
//!
//! Constructors validate raw strings so handlers never pass unchecked input
//! to a port or service.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::UserId;

/// Lifetime of an email verification token.
pub const VERIFICATION_TOKEN_TTL_MINUTES: i64 = 15;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use library_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Library.test", "password").unwrap();
/// assert_eq!(creds.email(), "admin@library.test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// One-time token proving control of a registration email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub token: Uuid,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Issue a fresh random token valid for [`VERIFICATION_TOKEN_TTL_MINUTES`].
    pub fn issue(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_id,
            expires_at: now + Duration::minutes(VERIFICATION_TOKEN_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
