//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CommentsCommand, CommentsQuery, ImageStore, ListingsCommand, ListingsQuery,
};
use crate::inbound::http::multipart::UploadLimits;

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub listings: Arc<dyn ListingsCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    /// Read access for serving stored uploads.
    pub images: Arc<dyn ImageStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub listings: Arc<dyn ListingsCommand>,
    pub listings_query: Arc<dyn ListingsQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub images: Arc<dyn ImageStore>,
    pub upload_limits: UploadLimits,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts, upload_limits: UploadLimits) -> Self {
        let HttpStatePorts {
            listings,
            listings_query,
            comments,
            comments_query,
            images,
        } = ports;
        Self {
            listings,
            listings_query,
            comments,
            comments_query,
            images,
            upload_limits,
        }
    }
}
