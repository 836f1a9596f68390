//! Driven adapters: PostgreSQL and in-memory persistence, and the upload
//! directory image store.

pub mod memory;
pub mod persistence;
pub mod uploads;
