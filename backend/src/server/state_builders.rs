//! Builders wiring repositories and services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use marketplace::domain::ports::{CommentRepository, ImageStore, ListingRepository};
use marketplace::domain::{CommentService, ListingService};
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::memory::{MemoryCommentRepository, MemoryListingRepository};
use marketplace::outbound::persistence::{DieselCommentRepository, DieselListingRepository};
use marketplace::outbound::uploads::CapStdImageStore;

use super::ServerConfig;

/// Build command and query ports over one pair of repositories.
fn build_ports<L, C>(
    listings: Arc<L>,
    comments: Arc<C>,
    images: Arc<CapStdImageStore>,
) -> HttpStatePorts
where
    L: ListingRepository + 'static,
    C: CommentRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let listing_service = Arc::new(ListingService::new(
        listings.clone(),
        comments.clone(),
        images.clone(),
        clock.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(comments, listings, clock));
    let images: Arc<dyn ImageStore> = images;

    HttpStatePorts {
        listings: listing_service.clone(),
        listings_query: listing_service,
        comments: comment_service.clone(),
        comments_query: comment_service,
        images,
    }
}

/// Build HTTP state backed by PostgreSQL when a pool is configured, otherwise
/// by in-memory repositories.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let images = Arc::new(CapStdImageStore::new(config.upload_dir.clone()));
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselListingRepository::new(pool.clone())),
            Arc::new(DieselCommentRepository::new(pool.clone())),
            images,
        ),
        None => {
            let listings = Arc::new(MemoryListingRepository::new());
            let comments = Arc::new(MemoryCommentRepository::linked_to(Arc::clone(&listings)));
            build_ports(listings, comments, images)
        }
    };
    web::Data::new(HttpState::new(ports, config.upload_limits))
}
