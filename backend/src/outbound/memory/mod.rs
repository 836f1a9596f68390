//! In-process repositories for running without PostgreSQL.
//!
//! Used when no database URL is configured and by behaviour tests. Both
//! repositories honour the same contracts as the Diesel adapters, including
//! newest-first ordering. State lives behind `RwLock`s; a poisoned lock is
//! reported as a query failure rather than a panic.

mod comment_repository;
mod listing_repository;

pub use comment_repository::MemoryCommentRepository;
pub use listing_repository::MemoryListingRepository;

const POISONED: &str = "in-memory store lock poisoned";
