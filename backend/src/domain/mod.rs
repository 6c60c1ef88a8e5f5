//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed library entities used by the HTTP and
//! persistence adapters, plus the services that implement the driving ports.
//! Services talk to storage, mail and hashing only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request correlation identifier in task-local scope.
//! - Book, Author, Genre, Order, OrderHistoryEntry, Review, User: entities.
//! - Caller: resolved identity passed into every user-scoped service call.

pub mod auth;
pub mod book;
pub mod error;
pub mod ids;
pub mod order;
pub mod ports;
pub mod review;
pub mod trace_id;
pub mod user;

mod account_service;
mod author_service;
mod book_service;
mod genre_service;
mod notification_service;
mod order_history_service;
mod order_service;
mod overdue_scanner;
mod repository_errors;
mod review_service;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::account_service::{
    AccountPorts, AccountService, BLOCKED_MESSAGE, BLOCKED_SUBJECT, VERIFICATION_SUBJECT,
};
pub use self::auth::{
    LoginCredentials, LoginValidationError, VERIFICATION_TOKEN_TTL_MINUTES, VerificationToken,
};
pub use self::author_service::AuthorService;
pub use self::book::{
    Author, AuthorDraft, AuthorName, Book, BookDetails, BookDraft, BookIdentity, BookListing,
    BookUpdate, CatalogueValidationError, Genre, GenreDraft, NewBook, PublicationYear,
};
pub use self::book_service::BookService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::genre_service::GenreService;
pub use self::ids::{AuthorId, BookId, GenreId, OrderHistoryId, OrderId, ReviewId, UserId};
pub use self::notification_service::{
    MailNotificationService, OVERDUE_BODY_TEMPLATE, OVERDUE_SUBJECT,
};
pub use self::order::{
    BookReturn, Checkout, CheckoutOutcome, Order, OrderHistoryEntry, OrderStatus, OrderSummary,
    OrderView, OutstandingOrder, ReturnOutcome, UnknownOrderStatus, UserHistoryEntry,
};
pub use self::order_history_service::OrderHistoryService;
pub use self::order_service::OrderService;
pub use self::overdue_scanner::{
    DEFAULT_OVERDUE_WINDOW_DAYS, OverdueScanReport, OverdueScanner, OverdueScannerConfig,
};
pub use self::review::{NewReview, Review, ReviewComment, ReviewValidationError, ReviewView};
pub use self::review_service::ReviewService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Caller, Email, NewUser, Registration, Role, UnknownRole, User, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use library_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
