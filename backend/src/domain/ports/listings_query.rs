//! Driving port for listing reads.

use async_trait::async_trait;

use crate::domain::{Error, Listing, ListingId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsQuery: Send + Sync {
    /// Every listing, newest first.
    async fn list(&self) -> Result<Vec<Listing>, Error>;

    /// One listing; absent ids are reported as `not_found`.
    async fn get(&self, id: ListingId) -> Result<Listing, Error>;
}
