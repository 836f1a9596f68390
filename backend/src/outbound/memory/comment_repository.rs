//! In-memory `CommentRepository`.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, ListingId};

use super::POISONED;
use super::MemoryListingRepository;

/// Comments kept in insertion order.
///
/// When linked to a listing repository, inserts check the listing under the
/// comment write lock, so a comment cannot outlive a concurrent listing
/// delete followed by `delete_for_listing`.
#[derive(Debug, Default)]
pub struct MemoryCommentRepository {
    rows: RwLock<Vec<Comment>>,
    listings: Option<Arc<MemoryListingRepository>>,
}

impl MemoryCommentRepository {
    /// An unlinked repository that accepts comments for any listing id.
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that rejects comments whose listing is not in `listings`.
    pub fn linked_to(listings: Arc<MemoryListingRepository>) -> Self {
        Self {
            rows: RwLock::default(),
            listings: Some(listings),
        }
    }
}

fn poisoned<T>(_: T) -> CommentRepositoryError {
    CommentRepositoryError::query(POISONED)
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if let Some(listings) = &self.listings {
            let exists = listings
                .contains(&comment.listing_id)
                .map_err(|err| CommentRepositoryError::query(err.to_string()))?;
            if !exists {
                return Err(CommentRepositoryError::missing_listing(format!(
                    "listing {} not found",
                    comment.listing_id
                )));
            }
        }
        rows.push(comment.clone());
        Ok(())
    }

    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut comments: Vec<Comment> = rows
            .iter()
            .rev()
            .filter(|row| &row.listing_id == listing_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn update_content(
        &self,
        id: &CommentId,
        content: &str,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        Ok(rows.iter_mut().find(|row| &row.id == id).map(|row| {
            content.clone_into(&mut row.content);
            row.clone()
        }))
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        Ok(rows.len() < before)
    }

    async fn delete_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<usize, CommentRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let before = rows.len();
        rows.retain(|row| &row.listing_id != listing_id);
        Ok(before - rows.len())
    }
}
