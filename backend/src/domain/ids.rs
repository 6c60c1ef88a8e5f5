//! Strongly typed identifiers for library entities.
//!
//! Storage assigns identifiers as 64-bit sequence values; wrapping them stops
//! a book id from being passed where an order id is expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw storage identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw storage identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Identifier of a catalogued book.
    BookId
);
define_id!(
    /// Identifier of an author.
    AuthorId
);
define_id!(
    /// Identifier of a genre.
    GenreId
);
define_id!(
    /// Identifier of a registered user.
    UserId
);
define_id!(
    /// Identifier of a loan.
    OrderId
);
define_id!(
    /// Identifier of an order history row.
    OrderHistoryId
);
define_id!(
    /// Identifier of a book review.
    ReviewId
);
