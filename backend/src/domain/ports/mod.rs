//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, mailer, hasher) are implemented by outbound
//! adapters. Driving ports (commands and queries) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod book_command;
mod book_repository;
mod mailer;
mod notifier;
mod order_command;
mod order_history_command;
mod order_repository;
mod password_hasher;
mod review_command;
mod review_repository;
mod user_repository;

pub use account_command::{AccountCommand, BlockOutcome, LoginService, UsersQuery};
#[cfg(test)]
pub use account_command::{MockAccountCommand, MockLoginService, MockUsersQuery};
pub use book_command::{AuthorCommand, BookCommand, BookQuery, GenreCommand, PageRequest};
#[cfg(test)]
pub use book_command::{MockAuthorCommand, MockBookCommand, MockBookQuery, MockGenreCommand};
pub use book_repository::{
    AuthorRepository, BookRepository, CatalogueRepositoryError, GenreRepository,
};
#[cfg(test)]
pub use book_repository::{MockAuthorRepository, MockBookRepository, MockGenreRepository};
pub use mailer::{MailMessage, Mailer, MailerError};
#[cfg(test)]
pub use mailer::MockMailer;
#[cfg(test)]
pub use notifier::{MockNotificationSender, MockOverdueNotifier};
pub use notifier::{NotificationSender, OverdueNotifier};
#[cfg(test)]
pub use order_command::{MockOrderCommand, MockOrderQuery};
pub use order_command::{OrderCommand, OrderQuery, TakeBookRequest};
#[cfg(test)]
pub use order_history_command::{MockOrderHistoryCommand, MockOrderHistoryQuery};
pub use order_history_command::{OrderHistoryCommand, OrderHistoryQuery};
#[cfg(test)]
pub use order_repository::{MockOrderHistoryRepository, MockOrderRepository};
pub use order_repository::{LendingRepositoryError, OrderHistoryRepository, OrderRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use review_command::{MockReviewCommand, MockReviewQuery};
pub use review_command::{ReviewCommand, ReviewQuery};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use user_repository::{MockUserRepository, MockVerificationTokenRepository};
pub use user_repository::{UserPersistenceError, UserRepository, VerificationTokenRepository};
