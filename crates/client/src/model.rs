//! Wire models for listings ("topics") and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A listing as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Listing title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Asking price, always positive.
    pub price: f64,
    /// Public image path such as `/uploads/<file>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Owner's email address.
    pub user_email: String,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A comment on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Comment text.
    pub content: String,
    /// Author's email address.
    pub user_email: String,
    /// Listing the comment belongs to.
    pub topic_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An image to upload with a listing.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name, kept as the suffix of the stored name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Form fields for a new listing. The price is sent as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTopic {
    /// Listing title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Price as entered; the server validates it.
    pub price: String,
    /// Listing image.
    pub image: ImageFile,
    /// Owner's email address.
    pub user_email: String,
    /// Optional category label.
    pub category: Option<String>,
}

/// Sparse listing update; `None` fields are left out of the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement price as entered.
    pub price: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement image.
    pub new_image: Option<ImageFile>,
    /// Image path the caller believes is current.
    pub old_image: Option<String>,
}

/// Body of a comment creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Comment text.
    pub content: String,
    /// Author's email address.
    pub user_email: String,
    /// Listing to comment on.
    pub topic_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicsEnvelope {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TopicCreatedEnvelope {
    pub new_topic: Topic,
}
