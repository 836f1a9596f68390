//! Driving port for listing mutations.
//!
//! HTTP handlers call this port with raw form input; implementations validate
//! it, coordinate the image store with the repository, and report failures as
//! domain [`Error`] values.

use async_trait::async_trait;

use crate::domain::{CreateListingRequest, Error, Listing, ListingId, UpdateListingRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Validate and store a new listing with its image.
    async fn create(&self, request: CreateListingRequest) -> Result<Listing, Error>;

    /// Apply a sparse update, optionally replacing the image.
    async fn update(&self, id: ListingId, request: UpdateListingRequest)
    -> Result<Listing, Error>;

    /// Delete a listing together with its comments and image.
    async fn delete(&self, id: ListingId) -> Result<(), Error>;
}
