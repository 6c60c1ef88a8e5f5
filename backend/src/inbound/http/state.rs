//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AuthorCommand, BookCommand, BookQuery, GenreCommand, LoginService,
    OrderCommand, OrderHistoryQuery, OrderQuery, ReviewCommand, ReviewQuery, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use library_backend::domain::ports::OrderCommand;
/// use library_backend::inbound::http::state::HttpState;
///
/// fn checkout_port(state: &HttpState) -> Arc<dyn OrderCommand> {
///     state.orders.clone()
/// }
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub orders: Arc<dyn OrderCommand>,
    pub orders_query: Arc<dyn OrderQuery>,
    pub history_query: Arc<dyn OrderHistoryQuery>,
    pub books: Arc<dyn BookCommand>,
    pub books_query: Arc<dyn BookQuery>,
    pub authors: Arc<dyn AuthorCommand>,
    pub genres: Arc<dyn GenreCommand>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
}
