//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! keep domain types free of utoipa derives. The document backs Swagger UI in
//! debug builds and is exported by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::comments::{CommentResponse, CreateCommentBody, UpdateCommentBody};
use crate::inbound::http::listings::{
    MessageResponse, TopicCreatedResponse, TopicResponse, TopicsResponse,
};
use crate::inbound::http::schemas::{
    CreateTopicForm, ErrorCodeSchema, ErrorSchema, UpdateTopicForm,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        description = "Listings with images, comments on listings, and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::listings::list_topics,
        crate::inbound::http::listings::create_topic,
        crate::inbound::http::listings::delete_topic,
        crate::inbound::http::listings::get_topic,
        crate::inbound::http::listings::update_topic,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::uploads::get_upload,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        TopicResponse,
        TopicsResponse,
        TopicCreatedResponse,
        MessageResponse,
        CreateTopicForm,
        UpdateTopicForm,
        CommentResponse,
        CreateCommentBody,
        UpdateCommentBody,
    )),
    tags(
        (name = "topics", description = "Marketplace listings"),
        (name = "comments", description = "Comments attached to listings"),
        (name = "uploads", description = "Stored listing images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
