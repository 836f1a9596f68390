//! Comment handlers.
//!
//! ```text
//! GET    /api/comments?topicId=   Comments on a topic, newest first
//! POST   /api/comments            Add a comment
//! PUT    /api/comments/{id}       Replace a comment's content
//! DELETE /api/comments/{id}       Remove a comment
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{FieldName, missing_fields_error};
use crate::domain::{Comment, CommentId, CreateCommentRequest, ListingId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listings::MessageResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const ID: FieldName = FieldName::new("id");
const TOPIC_ID: FieldName = FieldName::new("topicId");

/// Wire representation of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub user_email: String,
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            content: comment.content,
            user_email: comment.owner_email.to_string(),
            topic_id: comment.listing_id.to_string(),
            created_at: comment.created_at,
        }
    }
}

/// Comment creation body. Every field is optional on the wire so missing
/// ones can be reported together.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    pub content: Option<String>,
    pub user_email: Option<String>,
    pub topic_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCommentBody {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct CommentsQueryParams {
    /// Topic whose comments to list.
    pub topic_id: Option<String>,
}

/// List the comments on a topic.
#[utoipa::path(
    get,
    path = "/api/comments",
    params(CommentsQueryParams),
    responses(
        (status = 200, description = "Comments, newest first", body = [CommentResponse]),
        (status = 400, description = "Missing or malformed topicId", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/api/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    query: web::Query<CommentsQueryParams>,
) -> ApiResult<HttpResponse> {
    let raw = query
        .into_inner()
        .topic_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| missing_fields_error(&[TOPIC_ID]))?;
    let listing_id = ListingId::parse(&raw, TOPIC_ID)?;
    let comments: Vec<CommentResponse> = state
        .comments_query
        .list_for_listing(listing_id)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(comments))
}

/// Add a comment to a topic.
#[utoipa::path(
    post,
    path = "/api/comments",
    request_body = CreateCommentBody,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Topic not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/api/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    body: web::Json<CreateCommentBody>,
) -> ApiResult<HttpResponse> {
    let CreateCommentBody {
        content,
        user_email,
        topic_id,
    } = body.into_inner();
    let comment = state
        .comments
        .create(CreateCommentRequest {
            content,
            owner_email: user_email,
            listing_id: topic_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Replace a comment's content.
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = UpdateCommentBody,
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/api/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<UpdateCommentBody>,
) -> ApiResult<HttpResponse> {
    let id = CommentId::parse(&path.into_inner(), ID)?;
    let comment = state.comments.update(id, body.into_inner().content).await?;
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/api/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = CommentId::parse(&path.into_inner(), ID)?;
    state.comments.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}

#[cfg(test)]
mod tests {
    //! Comment handlers against mocked ports.

    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        MockCommentsCommand, MockCommentsQuery, MockImageStore, MockListingsCommand,
        MockListingsQuery,
    };
    use crate::domain::{Error, OwnerEmail};
    use crate::inbound::http::configure;
    use crate::inbound::http::multipart::UploadLimits;
    use crate::inbound::http::state::HttpStatePorts;

    const LISTING: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    const COMMENT: &str = "9b2e4c1a-0d6f-4e8b-a7c3-5f1d2e3b4a59";

    fn sample_comment(content: &str) -> Comment {
        Comment {
            id: CommentId::parse(COMMENT, ID).expect("comment id"),
            listing_id: ListingId::parse(LISTING, TOPIC_ID).expect("listing id"),
            content: content.to_owned(),
            owner_email: OwnerEmail::new("buyer@example.com").expect("email"),
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 10, 12, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    fn state(comments: MockCommentsCommand, comments_query: MockCommentsQuery) -> HttpState {
        HttpState::new(
            HttpStatePorts {
                listings: Arc::new(MockListingsCommand::new()),
                listings_query: Arc::new(MockListingsQuery::new()),
                comments: Arc::new(comments),
                comments_query: Arc::new(comments_query),
                images: Arc::new(MockImageStore::new()),
            },
            UploadLimits::default(),
        )
    }

    macro_rules! app {
        ($comments:expr, $query:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state($comments, $query)))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn list_returns_a_bare_array() {
        let mut query = MockCommentsQuery::new();
        query
            .expect_list_for_listing()
            .withf(|id| id.to_string() == LISTING)
            .times(1)
            .return_once(|_| Ok(vec![sample_comment("Still available?")]));
        let app = app!(MockCommentsCommand::new(), query);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/comments?topicId={LISTING}"))
                .to_request(),
        )
        .await;

        assert_eq!(
            body,
            json!([{
                "id": COMMENT,
                "content": "Still available?",
                "userEmail": "buyer@example.com",
                "topicId": LISTING,
                "createdAt": "2026-01-10T12:00:00Z",
            }])
        );
    }

    #[rstest]
    #[case::missing("/api/comments")]
    #[case::blank("/api/comments?topicId=%20")]
    #[case::malformed("/api/comments?topicId=abc")]
    #[actix_web::test]
    async fn list_rejects_bad_topic_ids(#[case] uri: &str) {
        let app = app!(MockCommentsCommand::new(), MockCommentsQuery::new());
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_maps_wire_fields_to_the_request() {
        let mut command = MockCommentsCommand::new();
        command
            .expect_create()
            .withf(|req| {
                req.content.as_deref() == Some("Still available?")
                    && req.owner_email.as_deref() == Some("buyer@example.com")
                    && req.listing_id.as_deref() == Some(LISTING)
            })
            .times(1)
            .return_once(|_| Ok(sample_comment("Still available?")));
        let app = app!(command, MockCommentsQuery::new());

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .set_json(json!({
                    "content": "Still available?",
                    "userEmail": "buyer@example.com",
                    "topicId": LISTING,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["topicId"], LISTING);
    }

    #[actix_web::test]
    async fn create_with_malformed_json_is_bad_request() {
        let app = app!(MockCommentsCommand::new(), MockCommentsQuery::new());
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/comments")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn update_surfaces_not_found() {
        let mut command = MockCommentsCommand::new();
        command
            .expect_update()
            .times(1)
            .return_once(|_, _| Err(Error::not_found("comment not found")));
        let app = app!(command, MockCommentsQuery::new());

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/comments/{COMMENT}"))
                .set_json(json!({ "content": "edited" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case::malformed("/api/comments/nope", StatusCode::BAD_REQUEST)]
    #[case::known("/api/comments/9b2e4c1a-0d6f-4e8b-a7c3-5f1d2e3b4a59", StatusCode::OK)]
    #[actix_web::test]
    async fn delete_statuses(#[case] uri: &str, #[case] expected: StatusCode) {
        let mut command = MockCommentsCommand::new();
        command.expect_delete().returning(|_| Ok(()));
        let app = app!(command, MockCommentsQuery::new());

        let res =
            test::call_service(&app, test::TestRequest::delete().uri(uri).to_request()).await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::OK {
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["message"], "Comment deleted");
        }
    }
}
