//! Comment use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, CommentsCommand, CommentsQuery, ListingRepository,
    ListingRepositoryError,
};
use crate::domain::validation::{FieldName, missing_fields_error, non_blank};
use crate::domain::{Comment, CommentId, CreateCommentRequest, Error, ListingId, OwnerEmail};

const CONTENT: FieldName = FieldName::new("content");
const USER_EMAIL: FieldName = FieldName::new("userEmail");
const TOPIC_ID: FieldName = FieldName::new("topicId");

/// Comment service implementing the comment driving ports.
///
/// Holds the listing repository only to check that a comment's listing
/// exists when the comment is created.
#[derive(Clone)]
pub struct CommentService<C, L> {
    comments: Arc<C>,
    listings: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<C, L> CommentService<C, L> {
    pub fn new(comments: Arc<C>, listings: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            listings,
            clock,
        }
    }
}

fn map_comment_error(err: CommentRepositoryError) -> Error {
    error!(error = %err, "comment repository failure");
    Error::internal(err.to_string())
}

fn map_listing_error(err: ListingRepositoryError) -> Error {
    error!(error = %err, "listing repository failure");
    Error::internal(err.to_string())
}

fn comment_not_found(id: &CommentId) -> Error {
    Error::not_found(format!("comment {id} not found"))
}

#[async_trait]
impl<C, L> CommentsCommand for CommentService<C, L>
where
    C: CommentRepository,
    L: ListingRepository,
{
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error> {
        let content = non_blank(request.content);
        let owner_email = request.owner_email.and_then(OwnerEmail::new);
        let listing_id = non_blank(request.listing_id);

        let (Some(content), Some(owner_email), Some(raw_listing_id)) =
            (content.clone(), owner_email.clone(), listing_id.clone())
        else {
            let missing: Vec<FieldName> = [
                (CONTENT, content.is_none()),
                (USER_EMAIL, owner_email.is_none()),
                (TOPIC_ID, listing_id.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            return Err(missing_fields_error(&missing));
        };
        let listing_id = ListingId::parse(&raw_listing_id, TOPIC_ID)?;

        self.listings
            .find_by_id(&listing_id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| Error::not_found(format!("topic {listing_id} not found")))?;

        let comment = Comment {
            id: CommentId::random(),
            listing_id,
            content,
            owner_email,
            created_at: self.clock.utc(),
        };
        self.comments
            .insert(&comment)
            .await
            .map_err(|err| match err {
                CommentRepositoryError::MissingListing { .. } => {
                    Error::not_found(format!("topic {listing_id} not found"))
                }
                other => map_comment_error(other),
            })?;
        info!(comment_id = %comment.id, listing_id = %listing_id, "comment created");
        Ok(comment)
    }

    async fn update(&self, id: CommentId, content: Option<String>) -> Result<Comment, Error> {
        let content = non_blank(content).ok_or_else(|| missing_fields_error(&[CONTENT]))?;
        self.comments
            .update_content(&id, &content)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(|| comment_not_found(&id))
    }

    async fn delete(&self, id: CommentId) -> Result<(), Error> {
        let removed = self
            .comments
            .delete(&id)
            .await
            .map_err(map_comment_error)?;
        if removed {
            info!(comment_id = %id, "comment deleted");
            Ok(())
        } else {
            Err(comment_not_found(&id))
        }
    }
}

#[async_trait]
impl<C, L> CommentsQuery for CommentService<C, L>
where
    C: CommentRepository,
    L: ListingRepository,
{
    async fn list_for_listing(&self, listing_id: ListingId) -> Result<Vec<Comment>, Error> {
        self.comments
            .list_for_listing(&listing_id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCommentRepository, MockListingRepository};
    use crate::domain::{ImagePath, Listing, Price};
    use chrono::{DateTime, Utc};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn make_service(
        comments: MockCommentRepository,
        listings: MockListingRepository,
    ) -> CommentService<MockCommentRepository, MockListingRepository> {
        CommentService::new(Arc::new(comments), Arc::new(listings), Arc::new(DefaultClock))
    }

    fn listing(id: ListingId, now: DateTime<Utc>) -> Listing {
        Listing {
            id,
            title: "Desk".to_owned(),
            description: "Pine".to_owned(),
            price: Price::new(30.0).expect("price"),
            image: Some(ImagePath::from_stored("/uploads/a-desk.png")),
            owner_email: OwnerEmail::new("seller@example.com").expect("email"),
            category: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(listing_id: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            content: Some("Is it still available?".to_owned()),
            owner_email: Some("buyer@example.com".to_owned()),
            listing_id: Some(listing_id.to_owned()),
        }
    }

    #[tokio::test]
    async fn create_stores_comment_for_existing_listing() {
        let id = ListingId::random();
        let mut listings = MockListingRepository::new();
        listings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(listing(id, Utc::now()))));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .times(1)
            .withf(move |comment| comment.listing_id == id)
            .return_once(|_| Ok(()));

        let service = make_service(comments, listings);
        let comment = service
            .create(request(&id.to_string()))
            .await
            .expect("create ok");
        assert_eq!(comment.content, "Is it still available?");
        assert_eq!(comment.owner_email.as_str(), "buyer@example.com");
    }

    #[tokio::test]
    async fn create_for_missing_listing_is_not_found() {
        let mut listings = MockListingRepository::new();
        listings.expect_find_by_id().return_once(|_| Ok(None));
        let mut comments = MockCommentRepository::new();
        comments.expect_insert().never();

        let service = make_service(comments, listings);
        let err = service
            .create(request(&ListingId::random().to_string()))
            .await
            .expect_err("no listing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn create_racing_a_listing_delete_is_not_found() {
        let id = ListingId::random();
        let mut listings = MockListingRepository::new();
        listings
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(listing(id, Utc::now()))));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_insert()
            .times(1)
            .return_once(|_| Err(CommentRepositoryError::missing_listing("deleted")));

        let service = make_service(comments, listings);
        let err = service
            .create(request(&id.to_string()))
            .await
            .expect_err("listing deleted meanwhile");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case::malformed_topic(request("not-a-uuid"))]
    #[case::blank_content(CreateCommentRequest { content: Some(" ".into()), ..request("x") })]
    #[case::missing_email(CreateCommentRequest { owner_email: None, ..request("x") })]
    #[tokio::test]
    async fn create_rejects_invalid_payloads(#[case] payload: CreateCommentRequest) {
        let service = make_service(MockCommentRepository::new(), MockListingRepository::new());
        let err = service.create(payload).await.expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_rejects_blank_content() {
        let service = make_service(MockCommentRepository::new(), MockListingRepository::new());
        let err = service
            .update(CommentId::random(), Some("   ".to_owned()))
            .await
            .expect_err("blank");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_of_unknown_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments.expect_update_content().return_once(|_, _| Ok(None));
        let service = make_service(comments, MockListingRepository::new());
        let err = service
            .update(CommentId::random(), Some("edited".to_owned()))
            .await
            .expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn delete_maps_missing_rows_to_not_found(
        #[case] removed: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut comments = MockCommentRepository::new();
        comments.expect_delete().return_once(move |_| Ok(removed));
        let service = make_service(comments, MockListingRepository::new());
        let result = service.delete(CommentId::random()).await;
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[tokio::test]
    async fn list_surfaces_repository_failures_as_internal() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_list_for_listing()
            .return_once(|_| Err(CommentRepositoryError::query("timeout")));
        let service = make_service(comments, MockListingRepository::new());
        let err = service
            .list_for_listing(ListingId::random())
            .await
            .expect_err("fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
