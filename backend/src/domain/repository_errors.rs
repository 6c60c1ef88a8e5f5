//! Mapping from port errors to domain errors shared by the services.
//!
//! Connection failures become `service_unavailable` so clients may retry;
//! anything else is an internal error.

use crate::domain::Error;
use crate::domain::ports::{
    CatalogueRepositoryError, LendingRepositoryError, MailerError, PasswordHashError,
    ReviewRepositoryError, UserPersistenceError,
};

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

pub(crate) fn map_lending_error(error: LendingRepositoryError) -> Error {
    match error {
        LendingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("lending repository unavailable: {message}"))
        }
        LendingRepositoryError::Query { message } => {
            Error::internal(format!("lending repository error: {message}"))
        }
    }
}

pub(crate) fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Every delivery failure surfaces as `mail_delivery_failed`.
pub(crate) fn map_mailer_error(error: MailerError) -> Error {
    Error::mail_delivery_failed(format!("Failed to send email: {error}"))
}
