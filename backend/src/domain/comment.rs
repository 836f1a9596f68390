//! Comments attached to listings.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Error;
use super::listing::{ListingId, OwnerEmail};
use super::validation::{FieldName, parse_uuid};

/// Identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn parse(raw: &str, field: FieldName) -> Result<Self, Error> {
        parse_uuid(raw, field).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub listing_id: ListingId,
    pub content: String,
    pub owner_email: OwnerEmail,
    pub created_at: DateTime<Utc>,
}

/// Raw comment creation payload.
#[derive(Debug, Clone, Default)]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub owner_email: Option<String>,
    pub listing_id: Option<String>,
}
