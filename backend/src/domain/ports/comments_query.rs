//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::{Comment, Error, ListingId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Comments on a listing, newest first. Unknown listings yield an empty
    /// list.
    async fn list_for_listing(&self, listing_id: ListingId) -> Result<Vec<Comment>, Error>;
}
