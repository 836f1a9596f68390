//! OpenAPI schema definitions for domain and form types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`; the
//! wrappers here mirror them for documentation only. The multipart form
//! schemas describe bodies that handlers read field by field.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested listing, comment, or file does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An uploaded file exceeds the configured limit.
    #[schema(rename = "payload_too_large")]
    PayloadTooLarge,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "please provide a valid price greater than zero")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{field, code, value}`.
    details: Option<serde_json::Value>,
}

/// `multipart/form-data` body for creating a topic.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CreateTopicForm {
    title: String,
    description: String,
    /// Decimal string greater than zero.
    #[schema(example = "19.99")]
    price: String,
    /// JPEG, PNG, or GIF file.
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
    user_email: String,
    category: Option<String>,
}

/// `multipart/form-data` body for updating a topic. Omitted fields are kept.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UpdateTopicForm {
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    category: Option<String>,
    /// Replacement image.
    #[schema(value_type = Option<String>, format = Binary)]
    new_image: Option<Vec<u8>>,
    /// Path the client believes is current; informational only.
    old_image: Option<String>,
}
