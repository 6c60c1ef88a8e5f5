//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Lending rules live in the domain services; the adapters
//!   only guarantee that checkout and return are atomic.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: every failure maps onto the owning port's
//!   `Connection` or `Query` variant.
//!
//! # Example
//!
//! ```ignore
//! use library_backend::outbound::persistence::{DbPool, DieselLendingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/library")).await?;
//! let orders = DieselLendingRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_catalogue_repository;
pub(crate) mod diesel_helpers;
mod diesel_lending_repository;
mod diesel_review_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_lending_repository::DieselLendingRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
