//! Catalogue entities: books, authors and genres.
//!
//! Books reference their author, genres and creator by identifier only.
//! Read paths that need names use [`BookListing`], a denormalised projection
//! assembled by the repository.

use chrono::NaiveDate;

use super::{AuthorId, BookId, GenreId, UserId};

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const NAME_MAX: usize = 100;

/// Validation failures for catalogue payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    Blank {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum character count.
        max: usize,
    },
    /// Publication year was not 1 to 4 digits.
    #[error("publication year must contain 1 to 4 digits")]
    InvalidPublicationYear,
    /// Quantity was below the permitted minimum.
    #[error("quantity must be at least {min}")]
    QuantityTooLow {
        /// Minimum accepted quantity.
        min: i32,
    },
    /// A new book was submitted without genres.
    #[error("at least one genre is required")]
    MissingGenres,
}

fn required_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<String, CatalogueValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogueValidationError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(CatalogueValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn optional_text(
    value: Option<&str>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, CatalogueValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > max => {
            Err(CatalogueValidationError::TooLong { field, max })
        }
        Some(text) => Ok(Some(text.to_owned())),
    }
}

/// Publication year stored as 1 to 4 digits (e.g. `"1869"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicationYear(String);

impl PublicationYear {
    /// Validate a raw year string.
    pub fn new(raw: &str) -> Result<Self, CatalogueValidationError> {
        let trimmed = raw.trim();
        let valid = (1..=4).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_digit());
        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(CatalogueValidationError::InvalidPublicationYear)
        }
    }
}

impl AsRef<str> for PublicationYear {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Editable book fields shared by creation and detail updates.
///
/// ## Invariants
/// - `title` is trimmed, non-empty and at most 100 characters.
/// - `description`, when present, is at most 500 characters.
/// - `quantity >= 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    title: String,
    description: Option<String>,
    publication_year: PublicationYear,
    quantity: i32,
}

impl BookDetails {
    /// Validate raw detail values.
    pub fn try_new(
        title: &str,
        description: Option<&str>,
        publication_year: &str,
        quantity: i32,
    ) -> Result<Self, CatalogueValidationError> {
        if quantity < 0 {
            return Err(CatalogueValidationError::QuantityTooLow { min: 0 });
        }
        Ok(Self {
            title: required_text(title, "title", TITLE_MAX)?,
            description: optional_text(description, "description", DESCRIPTION_MAX)?,
            publication_year: PublicationYear::new(publication_year)?,
            quantity,
        })
    }

    /// Book title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Publication year.
    pub fn publication_year(&self) -> &PublicationYear {
        &self.publication_year
    }

    /// Copies available for checkout.
    pub fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Author first and last name, used to look up or create authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorName {
    firstname: String,
    lastname: String,
}

impl AuthorName {
    /// Validate an author's name.
    pub fn try_new(firstname: &str, lastname: &str) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            firstname: required_text(firstname, "firstname", NAME_MAX)?,
            lastname: required_text(lastname, "lastname", NAME_MAX)?,
        })
    }

    /// Given name.
    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    /// Family name.
    pub fn lastname(&self) -> &str {
        &self.lastname
    }
}

/// Full book submission: details plus author and genre names.
///
/// Authors and genres that do not exist yet are created alongside the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    details: BookDetails,
    author: AuthorName,
    genre_titles: Vec<String>,
}

impl BookDraft {
    /// Validate a book submission. New books need at least one copy and one
    /// genre.
    pub fn try_new(
        details: BookDetails,
        author: AuthorName,
        genre_titles: &[String],
    ) -> Result<Self, CatalogueValidationError> {
        if details.quantity() < 1 {
            return Err(CatalogueValidationError::QuantityTooLow { min: 1 });
        }
        let mut titles = Vec::with_capacity(genre_titles.len());
        for raw in genre_titles {
            let title = required_text(raw, "genre", NAME_MAX)?;
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
        if titles.is_empty() {
            return Err(CatalogueValidationError::MissingGenres);
        }
        Ok(Self {
            details,
            author,
            genre_titles: titles,
        })
    }

    /// Book details.
    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    /// Author name.
    pub fn author(&self) -> &AuthorName {
        &self.author
    }

    /// Distinct genre titles in submission order.
    pub fn genre_titles(&self) -> &[String] {
        &self.genre_titles
    }
}

/// A catalogued book.
///
/// `quantity` is only changed by checkout and return (or an explicit admin
/// edit) and never drops below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: Option<String>,
    pub publication_year: String,
    pub quantity: i32,
    pub author_id: AuthorId,
    pub genre_ids: Vec<GenreId>,
    pub created_by: UserId,
}

impl Book {
    /// Whether at least one copy can be checked out.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Whether `user` created this book and may therefore edit it.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.created_by == user
    }
}

/// Insert payload for a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub details: BookDetails,
    pub author_id: AuthorId,
    pub genre_ids: Vec<GenreId>,
    pub created_by: UserId,
}

/// Full replacement of a book's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub id: BookId,
    pub details: BookDetails,
    pub author_id: AuthorId,
    pub genre_ids: Vec<GenreId>,
}

/// Lookup key used to reject duplicate catalogue entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookIdentity {
    pub title: String,
    pub author_id: AuthorId,
    pub publication_year: String,
    /// Book being edited; it never counts as its own duplicate.
    pub excluding: Option<BookId>,
}

/// An author record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub firstname: String,
    pub lastname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub birthplace: Option<String>,
}

/// Replacement values for an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDraft {
    pub name: AuthorName,
    pub date_of_birth: Option<NaiveDate>,
    pub birthplace: Option<String>,
}

impl AuthorDraft {
    /// Validate author replacement values.
    pub fn try_new(
        firstname: &str,
        lastname: &str,
        date_of_birth: Option<NaiveDate>,
        birthplace: Option<&str>,
    ) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            name: AuthorName::try_new(firstname, lastname)?,
            date_of_birth,
            birthplace: optional_text(birthplace, "birthplace", NAME_MAX)?,
        })
    }
}

/// A genre record. Titles are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub title: String,
    pub description: Option<String>,
}

/// Replacement values for a genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDraft {
    pub title: String,
    pub description: Option<String>,
}

impl GenreDraft {
    /// Validate genre replacement values.
    pub fn try_new(
        title: &str,
        description: Option<&str>,
    ) -> Result<Self, CatalogueValidationError> {
        Ok(Self {
            title: required_text(title, "title", NAME_MAX)?,
            description: optional_text(description, "description", DESCRIPTION_MAX)?,
        })
    }
}

/// Book joined with its author and genres for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookListing {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
}
