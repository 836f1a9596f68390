//! Topic (listing) handlers.
//!
//! ```text
//! GET    /api/topics          List every topic, newest first
//! POST   /api/topics          Create a topic from a multipart form
//! DELETE /api/topics?id=      Delete a topic
//! GET    /api/topics/{id}     Fetch one topic
//! PUT    /api/topics/{id}     Sparse update from a multipart form
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::{FieldName, missing_fields_error};
use crate::domain::{CreateListingRequest, Listing, ListingId, UpdateListingRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{FormFields, read_form};
use crate::inbound::http::schemas::{CreateTopicForm, ErrorSchema, UpdateTopicForm};
use crate::inbound::http::state::HttpState;

const ID: FieldName = FieldName::new("id");

const CREATE_FORM: FormFields = FormFields {
    texts: &["title", "description", "price", "userEmail", "category"],
    files: &["image"],
};

const UPDATE_FORM: FormFields = FormFields {
    texts: &["title", "description", "price", "category", "oldImage"],
    files: &["newImage"],
};

/// Wire representation of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = 19.99)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "/uploads/3fa85f64-5717-4562-b3fc-2c963f66afa6-chair.png")]
    pub image: Option<String>,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for TopicResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.to_string(),
            title: listing.title,
            description: listing.description,
            price: listing.price.value(),
            image: listing.image.map(String::from),
            user_email: listing.owner_email.to_string(),
            category: listing.category,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<TopicResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreatedResponse {
    #[schema(example = "Topic created successfully")]
    pub message: String,
    pub new_topic: TopicResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteTopicQuery {
    /// Topic identifier.
    pub id: Option<String>,
}

/// List every topic, newest first.
#[utoipa::path(
    get,
    path = "/api/topics",
    responses(
        (status = 200, description = "All topics", body = TopicsResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "listTopics"
)]
#[get("/api/topics")]
pub async fn list_topics(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let topics = state
        .listings_query
        .list()
        .await?
        .into_iter()
        .map(TopicResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(TopicsResponse { topics }))
}

/// Create a topic with its image.
#[utoipa::path(
    post,
    path = "/api/topics",
    request_body(content = CreateTopicForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Topic created", body = TopicCreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 413, description = "Image too large", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "createTopic"
)]
#[post("/api/topics")]
pub async fn create_topic(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let mut form = read_form(payload, CREATE_FORM, state.upload_limits).await?;
    let request = CreateListingRequest {
        title: form.take_text("title"),
        description: form.take_text("description"),
        price: form.take_text("price"),
        image: form.take_file("image"),
        owner_email: form.take_text("userEmail"),
        category: form.take_text("category"),
    };
    let listing = state.listings.create(request).await?;
    Ok(HttpResponse::Created().json(TopicCreatedResponse {
        message: "Topic created successfully".to_owned(),
        new_topic: listing.into(),
    }))
}

/// Delete a topic, its comments, and its image.
#[utoipa::path(
    delete,
    path = "/api/topics",
    params(DeleteTopicQuery),
    responses(
        (status = 200, description = "Topic deleted", body = MessageResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorSchema),
        (status = 404, description = "Topic not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "deleteTopic"
)]
#[delete("/api/topics")]
pub async fn delete_topic(
    state: web::Data<HttpState>,
    query: web::Query<DeleteTopicQuery>,
) -> ApiResult<HttpResponse> {
    let raw = query
        .into_inner()
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| missing_fields_error(&[ID]))?;
    let id = ListingId::parse(&raw, ID)?;
    state.listings.delete(id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Topic deleted")))
}

/// Fetch one topic.
#[utoipa::path(
    get,
    path = "/api/topics/{id}",
    params(("id" = String, Path, description = "Topic identifier")),
    responses(
        (status = 200, description = "Topic", body = TopicResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Topic not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "getTopic"
)]
#[get("/api/topics/{id}")]
pub async fn get_topic(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ListingId::parse(&path.into_inner(), ID)?;
    let listing = state.listings_query.get(id).await?;
    Ok(HttpResponse::Ok().json(TopicResponse::from(listing)))
}

/// Update a topic; omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/topics/{id}",
    params(("id" = String, Path, description = "Topic identifier")),
    request_body(content = UpdateTopicForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated topic", body = TopicResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Topic not found", body = ErrorSchema),
        (status = 413, description = "Image too large", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["topics"],
    operation_id = "updateTopic"
)]
#[put("/api/topics/{id}")]
pub async fn update_topic(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = ListingId::parse(&path.into_inner(), ID)?;
    let mut form = read_form(payload, UPDATE_FORM, state.upload_limits).await?;
    let request = UpdateListingRequest {
        title: form.take_text("title"),
        description: form.take_text("description"),
        price: form.take_text("price"),
        category: form.take_text("category"),
        new_image: form.take_file("newImage"),
        old_image: form.take_text("oldImage"),
    };
    let listing = state.listings.update(id, request).await?;
    Ok(HttpResponse::Ok().json(TopicResponse::from(listing)))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
