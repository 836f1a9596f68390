//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod comments;
pub mod error;
pub mod health;
pub mod listings;
pub mod multipart;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;

use actix_web::web;

pub use error::ApiResult;

/// Register the marketplace endpoints and extractor error handlers.
///
/// Expects [`state::HttpState`] to be registered as app data by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(listings::list_topics)
        .service(listings::create_topic)
        .service(listings::delete_topic)
        .service(listings::get_topic)
        .service(listings::update_topic)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment)
        .service(uploads::get_upload);
}
