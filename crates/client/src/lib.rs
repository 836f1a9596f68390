//! Client for the marketplace HTTP API.
//!
//! [`MarketplaceClient`] speaks the wire protocol. The view modules hold the
//! state a front end keeps between requests: the listing list and dashboard,
//! the listing detail page with its comment composer, and the capped
//! recently-viewed history persisted on disk.

pub mod api;
pub mod detail_view;
pub mod error;
pub mod list_view;
pub mod model;
pub mod recently_viewed;

pub use api::{ClientConfig, MarketplaceApi, MarketplaceClient};
pub use detail_view::{CommentComposer, ComposerMode, DetailState, DetailView, ImagePreview};
pub use error::ClientError;
pub use list_view::{DashboardView, ListState, ListView};
pub use model::{Comment, ImageFile, NewComment, NewTopic, Topic, TopicUpdate};
pub use recently_viewed::{RECENTLY_VIEWED_CAPACITY, RecentlyViewed, RecentlyViewedStore};

/// Placeholder image shown for listings without an upload.
pub const DEFAULT_IMAGE_PATH: &str = "/default-avatar.png";
