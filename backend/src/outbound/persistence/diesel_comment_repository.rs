//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, ListingId, OwnerEmail};

use super::diesel_helpers::{classify_diesel_error, classify_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let owner_email = OwnerEmail::new(row.owner_email)
        .ok_or_else(|| CommentRepositoryError::query("stored comment has blank owner email"))?;
    Ok(Comment {
        id: CommentId::from_uuid(row.id),
        listing_id: ListingId::from_uuid(row.listing_id),
        content: row.content,
        owner_email,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row = NewCommentRow {
            id: *comment.id.as_uuid(),
            listing_id: *comment.listing_id.as_uuid(),
            content: &comment.content,
            owner_email: comment.owner_email.as_str(),
            created_at: comment.created_at,
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| classify_diesel_error(err, "insert comment").into())
    }

    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::listing_id.eq(listing_id.as_uuid()))
            .order(comments::created_at.desc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| classify_diesel_error(err, "list comments"))?;
        rows.into_iter().map(row_to_comment).collect()
    }

    async fn update_content(
        &self,
        id: &CommentId,
        content: &str,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row: Option<CommentRow> = diesel::update(comments::table.find(id.as_uuid()))
            .set(comments::content.eq(content))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| classify_diesel_error(err, "update comment"))?;
        row.map(row_to_comment).transpose()
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let removed = diesel::delete(comments::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| classify_diesel_error(err, "delete comment"))?;
        Ok(removed > 0)
    }

    async fn delete_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<usize, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        diesel::delete(comments::table.filter(comments::listing_id.eq(listing_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(|err| classify_diesel_error(err, "delete comments for listing").into())
    }
}
