//! Diesel row structs. Internal to the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{comments, listings};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: Option<String>,
    pub owner_email: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price: f64,
    pub image: Option<&'a str>,
    pub owner_email: &'a str,
    pub category: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse listing update. `None` skips the column; `Some(None)` on `category`
/// or `image` clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub(crate) struct ListingChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub category: Option<Option<&'a str>>,
    pub image: Option<Option<&'a str>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub content: String,
    pub owner_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub content: &'a str,
    pub owner_email: &'a str,
    pub created_at: DateTime<Utc>,
}
