//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CreateCommentRequest, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Add a comment to an existing listing.
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error>;

    /// Replace a comment's content.
    async fn update(&self, id: CommentId, content: Option<String>) -> Result<Comment, Error>;

    async fn delete(&self, id: CommentId) -> Result<(), Error>;
}
