//! Driven port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, ListingId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
        /// The comment's listing no longer exists.
        MissingListing { message: String } =>
            "comment references a missing listing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a new comment. Fails with `MissingListing` when its listing is
    /// gone.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError>;

    /// Comments for one listing, newest first.
    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Replace the content of a comment and return the updated row.
    async fn update_content(
        &self,
        id: &CommentId,
        content: &str,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError>;

    /// Remove every comment on a listing and return how many went.
    async fn delete_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<usize, CommentRepositoryError>;
}
