//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, the image store) expose typed error enums so
//! adapters map their failures into predictable variants. Driving ports
//! (commands and queries) speak domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod comments_command;
mod comments_query;
mod image_store;
mod listing_repository;
mod listings_command;
mod listings_query;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use comments_command::MockCommentsCommand;
pub use comments_command::CommentsCommand;
#[cfg(test)]
pub use comments_query::MockCommentsQuery;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError, StagedImage};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingRepository, ListingRepositoryError};
#[cfg(test)]
pub use listings_command::MockListingsCommand;
pub use listings_command::ListingsCommand;
#[cfg(test)]
pub use listings_query::MockListingsQuery;
pub use listings_query::ListingsQuery;
