//! Library management backend.
//!
//! Hexagonal layout: `domain` holds entities, services and ports;
//! `inbound::http` adapts them to actix-web; `outbound` provides the
//! diesel, in-memory, mail and password adapters.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
