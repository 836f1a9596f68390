//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and nothing
//! more. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a lazily built `bb8` pool
//! through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use marketplace::outbound::persistence::{DbPool, DieselListingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace"));
//! let repo = DieselListingRepository::new(pool);
//! ```

mod diesel_comment_repository;
pub(crate) mod diesel_helpers;
mod diesel_listing_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
