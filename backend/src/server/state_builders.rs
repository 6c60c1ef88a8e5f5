//! Builders wiring storage adapters into domain services and HTTP state.

use std::sync::Arc;

use futures_util::future::LocalBoxFuture;

use library_backend::domain::ports::{
    AuthorRepository, BookRepository, GenreRepository, OrderHistoryRepository, OrderRepository,
    ReviewRepository, UserRepository, VerificationTokenRepository,
};
use library_backend::domain::{
    AccountPorts, AccountService, AuthorService, BookService, GenreService,
    MailNotificationService, OrderHistoryService, OrderService, OverdueScanner, ReviewService,
};
use library_backend::inbound::http::state::HttpState;
use library_backend::outbound::memory::MemoryStore;
use library_backend::outbound::persistence::{
    DieselAccountRepository, DieselCatalogueRepository, DieselLendingRepository,
    DieselReviewRepository,
};
use library_backend::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Everything the server needs from the domain layer.
pub struct LibraryServices {
    pub http_state: HttpState,
    /// Kept separately for the startup admin bootstrap.
    pub accounts: Arc<AccountService>,
    /// Overdue scanner loop; spawn it once on the server's runtime.
    pub scanner: LocalBoxFuture<'static, ()>,
}

/// Build services over diesel repositories when a pool is configured,
/// otherwise over a fresh in-memory store.
pub fn build_services(config: &ServerConfig) -> LibraryServices {
    match &config.db_pool {
        Some(pool) => wire(
            config,
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselCatalogueRepository::new(pool.clone())),
            Arc::new(DieselLendingRepository::new(pool.clone())),
            Arc::new(DieselReviewRepository::new(pool.clone())),
        ),
        None => {
            let store = Arc::new(MemoryStore::new());
            wire(config, store.clone(), store.clone(), store.clone(), store)
        }
    }
}

fn wire<U, C, L, R>(
    config: &ServerConfig,
    users: Arc<U>,
    catalogue: Arc<C>,
    lending: Arc<L>,
    reviews: Arc<R>,
) -> LibraryServices
where
    U: UserRepository + VerificationTokenRepository + 'static,
    C: BookRepository + AuthorRepository + GenreRepository + 'static,
    L: OrderRepository + OrderHistoryRepository + 'static,
    R: ReviewRepository + 'static,
{
    let clock = config.clock.clone();
    let notifications = Arc::new(MailNotificationService::new(config.mailer.clone()));

    let accounts = Arc::new(AccountService::new(
        AccountPorts {
            users: users.clone(),
            tokens: users,
            books: catalogue.clone(),
            hasher: Arc::new(BcryptPasswordHasher::with_cost(config.password_cost)),
            notifier: notifications.clone(),
        },
        clock.clone(),
        config.public_base_url.clone(),
    ));
    let orders = Arc::new(OrderService::new(
        lending.clone(),
        catalogue.clone(),
        clock.clone(),
    ));
    let history = Arc::new(OrderHistoryService::new(lending.clone(), clock.clone()));
    let books = Arc::new(BookService::new(
        catalogue.clone(),
        catalogue.clone(),
        catalogue.clone(),
    ));
    let review_service = Arc::new(ReviewService::new(reviews, catalogue.clone()));
    let scanner = OverdueScanner::new(lending, notifications, clock, config.scanner);

    let http_state = HttpState {
        login: accounts.clone(),
        users: accounts.clone(),
        accounts: accounts.clone(),
        orders: orders.clone(),
        orders_query: orders,
        history_query: history,
        books: books.clone(),
        books_query: books,
        authors: Arc::new(AuthorService::new(catalogue.clone())),
        genres: Arc::new(GenreService::new(catalogue)),
        reviews: review_service.clone(),
        reviews_query: review_service,
    };

    LibraryServices {
        http_state,
        accounts,
        scanner: Box::pin(scanner.run()),
    }
}
