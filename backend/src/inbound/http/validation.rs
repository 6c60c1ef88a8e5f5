//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors reject bad input with small typed errors; these
//! helpers turn them into `400` responses whose `details` name the offending
//! field and a stable machine-readable code.

use serde_json::json;

use crate::domain::{
    CatalogueValidationError, Error, LoginValidationError, ReviewValidationError,
    UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    Blank,
    TooLong,
    InvalidEmail,
    InvalidPublicationYear,
    QuantityTooLow,
    MissingGenres,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::TooLong => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPublicationYear => "invalid_publication_year",
            Self::QuantityTooLow => "quantity_too_low",
            Self::MissingGenres => "missing_genres",
        }
    }
}

fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn map_catalogue_validation(err: CatalogueValidationError) -> Error {
    let message = err.to_string();
    match err {
        CatalogueValidationError::Blank { field } => {
            field_error(field, ValidationCode::Blank, message)
        }
        CatalogueValidationError::TooLong { field, .. } => {
            field_error(field, ValidationCode::TooLong, message)
        }
        CatalogueValidationError::InvalidPublicationYear => field_error(
            "publication_year",
            ValidationCode::InvalidPublicationYear,
            message,
        ),
        CatalogueValidationError::QuantityTooLow { .. } => {
            field_error("quantity", ValidationCode::QuantityTooLow, message)
        }
        CatalogueValidationError::MissingGenres => {
            field_error("genres", ValidationCode::MissingGenres, message)
        }
    }
}

pub(crate) fn map_user_validation(err: UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::Blank { field } => field_error(field, ValidationCode::Blank, message),
        UserValidationError::TooLong { field, .. } => {
            field_error(field, ValidationCode::TooLong, message)
        }
        UserValidationError::InvalidEmail => {
            field_error("email", ValidationCode::InvalidEmail, message)
        }
    }
}

pub(crate) fn map_login_validation(err: LoginValidationError) -> Error {
    let message = err.to_string();
    match err {
        LoginValidationError::EmptyEmail => field_error("email", ValidationCode::Blank, message),
        LoginValidationError::EmptyPassword => {
            field_error("password", ValidationCode::Blank, message)
        }
    }
}

pub(crate) fn map_review_validation(err: ReviewValidationError) -> Error {
    let message = err.to_string();
    match err {
        ReviewValidationError::EmptyComment => {
            field_error("comment", ValidationCode::Blank, message)
        }
        ReviewValidationError::CommentTooLong { .. } => {
            field_error("comment", ValidationCode::TooLong, message)
        }
    }
}
