//! Driven port for listing persistence.

use async_trait::async_trait;

use crate::domain::{Listing, ListingChanges, ListingId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing repository adapters.
    pub enum ListingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "listing repository query failed: {message}",
    }
}

/// Storage contract for listings.
///
/// Mutating calls report an absent row as `Ok(None)` rather than an error so
/// the service decides how a missing listing surfaces to callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError>;

    /// All listings ordered by `created_at` descending.
    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingRepositoryError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Apply a sparse update and return the stored row afterwards.
    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingRepositoryError>;

    /// Remove a listing, returning the row that was removed.
    async fn delete(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError>;
}
