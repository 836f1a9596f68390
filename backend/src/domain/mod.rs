//! Domain primitives, ports, and use-case services.
//!
//! Purpose: define the listing and comment model, the validation rules that
//! guard it, and the services that coordinate persistence with image storage.
//! Nothing here knows about HTTP, SQL, or the filesystem.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Listing, Comment: stored entities plus their request types.
//! - ListingService, CommentService: implementations of the driving ports.

pub mod comment;
pub mod comment_service;
pub mod error;
pub mod image;
pub mod listing;
pub mod listing_service;
pub mod ports;
pub mod trace_id;
pub mod validation;

pub use self::comment::{Comment, CommentId, CreateCommentRequest};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::image::{
    DEFAULT_IMAGE_PATH, ImagePath, ImageUpload, StoredFileName, UPLOADS_PREFIX,
    is_allowed_content_type,
};
pub use self::listing::{
    CategoryChange, CreateListingRequest, ImageChange, Listing, ListingChanges, ListingId, OwnerEmail, Price,
    UpdateListingRequest,
};
pub use self::listing_service::ListingService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such topic"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
