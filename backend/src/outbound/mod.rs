//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process store implementing the same repository ports
//! - **mail**: logging and HTTP relay mailers
//! - **security**: password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod security;
