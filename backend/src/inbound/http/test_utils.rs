//! Test helpers for inbound HTTP components.

use std::path::Path;
use std::sync::Arc;

use actix_web::http::header::CONTENT_TYPE;
use mockable::DefaultClock;

use crate::domain::{CommentService, ListingService};
use crate::inbound::http::multipart::UploadLimits;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{MemoryCommentRepository, MemoryListingRepository};
use crate::outbound::uploads::CapStdImageStore;

const BOUNDARY: &str = "----marketplace-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// `Content-Type` header matching the body boundary.
    pub fn content_type(&self) -> (actix_web::http::header::HeaderName, String) {
        (CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// HTTP state wired to in-memory repositories and an upload directory under
/// `root`.
pub fn in_memory_state(root: &Path, limits: UploadLimits) -> HttpState {
    let listings = Arc::new(MemoryListingRepository::new());
    let comments = Arc::new(MemoryCommentRepository::linked_to(listings.clone()));
    let images = Arc::new(CapStdImageStore::new(root.join("uploads")));
    let clock = Arc::new(DefaultClock);

    let listing_service = Arc::new(ListingService::new(
        listings.clone(),
        comments.clone(),
        images.clone(),
        clock.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(comments, listings, clock));

    HttpState::new(
        HttpStatePorts {
            listings: listing_service.clone(),
            listings_query: listing_service,
            comments: comment_service.clone(),
            comments_query: comment_service,
            images,
        },
        limits,
    )
}
