//! Listings: items offered for sale.
//!
//! A listing is created from a multipart form and mutated through sparse
//! updates. Value types here enforce the invariants that survive both paths:
//! a non-blank title, description and owner email, and a strictly positive
//! finite price.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;
use super::image::{ImagePath, ImageUpload};
use super::validation::{FieldName, invalid_price_error, parse_uuid};

/// Identifier of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a client-supplied identifier; malformed input is `invalid_request`.
    pub fn parse(raw: &str, field: FieldName) -> Result<Self, Error> {
        parse_uuid(raw, field).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Asking price. Always finite and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Parse a form value such as `"19.99"`.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| invalid_price_error(raw))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Email address of the user who owns a listing or comment.
///
/// Supplied by the identity provider in front of the service and only checked
/// for blankness here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OwnerEmail(String);

impl OwnerEmail {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub image: Option<ImagePath>,
    pub owner_email: OwnerEmail,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw creation form as received from a client.
///
/// Every field is optional here so the service can report all missing
/// fields at once.
#[derive(Debug, Clone, Default)]
pub struct CreateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<ImageUpload>,
    pub owner_email: Option<String>,
    pub category: Option<String>,
}

/// Raw sparse update form.
#[derive(Debug, Clone, Default)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub new_image: Option<ImageUpload>,
    /// Image path the client believes is current. Informational only: the
    /// stored record decides which file is replaced.
    pub old_image: Option<String>,
}

/// What an update does to the stored image path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Set(ImagePath),
    Clear,
}

/// What an update does to the optional category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryChange {
    #[default]
    Keep,
    Set(String),
    Clear,
}

impl CategoryChange {
    /// Change that leaves the category equal to `category`.
    pub fn restoring(category: Option<&str>) -> Self {
        category.map_or(Self::Clear, |value| Self::Set(value.to_owned()))
    }
}

/// Validated field changes applied by a repository update.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: CategoryChange,
    pub image: ImageChange,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingChanges {
    /// Whether any listing field other than the timestamp changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category == CategoryChange::Keep
            && self.image == ImageChange::Keep
    }

    /// Changes that put every mutable field back to `previous`.
    pub fn restoring(previous: &Listing) -> Self {
        Self {
            title: Some(previous.title.clone()),
            description: Some(previous.description.clone()),
            price: Some(previous.price),
            category: CategoryChange::restoring(previous.category.as_deref()),
            image: previous
                .image
                .clone()
                .map_or(ImageChange::Clear, ImageChange::Set),
            updated_at: Some(previous.updated_at),
        }
    }

    /// Apply the changes to an in-memory listing.
    pub fn apply_to(&self, listing: &mut Listing) {
        if let Some(title) = &self.title {
            listing.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            listing.description.clone_from(description);
        }
        if let Some(price) = self.price {
            listing.price = price;
        }
        match &self.category {
            CategoryChange::Keep => {}
            CategoryChange::Set(category) => listing.category = Some(category.clone()),
            CategoryChange::Clear => listing.category = None,
        }
        match &self.image {
            ImageChange::Keep => {}
            ImageChange::Set(path) => listing.image = Some(path.clone()),
            ImageChange::Clear => listing.image = None,
        }
        if let Some(updated_at) = self.updated_at {
            listing.updated_at = updated_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("19.99", 19.99)]
    #[case(" 5 ", 5.0)]
    #[case("0.01", 0.01)]
    fn price_parses_positive_numbers_unchanged(#[case] raw: &str, #[case] expected: f64) {
        let price = Price::parse(raw).expect("valid price");
        assert!((price.value() - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("-5")]
    #[case("0")]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    #[case("")]
    fn price_rejects_non_positive_or_non_numeric(#[case] raw: &str) {
        let err = Price::parse(raw).expect_err("invalid price");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("valid price"));
    }

    #[test]
    fn owner_email_trims_and_rejects_blank() {
        assert_eq!(
            OwnerEmail::new(" a@b.c ").map(|e| e.as_str().to_owned()),
            Some("a@b.c".to_owned())
        );
        assert!(OwnerEmail::new("  ").is_none());
    }

    #[test]
    fn listing_id_parse_reports_the_field() {
        let err = ListingId::parse("abc", FieldName::new("topicId")).expect_err("malformed");
        assert_eq!(
            err.details().and_then(|d| d.get("field")),
            Some(&serde_json::json!("topicId"))
        );
    }

    #[test]
    fn changes_leave_omitted_fields_untouched() {
        let created = Utc::now();
        let mut listing = Listing {
            id: ListingId::random(),
            title: "Chair".into(),
            description: "Oak".into(),
            price: Price::new(10.0).expect("price"),
            image: Some(ImagePath::from_stored("/uploads/a-chair.png")),
            owner_email: OwnerEmail::new("a@b.c").expect("email"),
            category: None,
            created_at: created,
            updated_at: created,
        };
        let changes = ListingChanges {
            title: Some("Table".into()),
            ..ListingChanges::default()
        };
        changes.apply_to(&mut listing);
        assert_eq!(listing.title, "Table");
        assert_eq!(listing.description, "Oak");
        assert_eq!(
            listing.image.as_ref().map(ImagePath::as_str),
            Some("/uploads/a-chair.png")
        );
        assert!(!changes.is_empty());
        assert!(ListingChanges::default().is_empty());
    }

    #[test]
    fn restoring_clears_an_image_that_was_absent() {
        let now = Utc::now();
        let previous = Listing {
            id: ListingId::random(),
            title: "Lamp".into(),
            description: "Brass".into(),
            price: Price::new(4.5).expect("price"),
            image: None,
            owner_email: OwnerEmail::new("a@b.c").expect("email"),
            category: None,
            created_at: now,
            updated_at: now,
        };
        let mut current = previous.clone();
        current.image = Some(ImagePath::from_stored("/uploads/x-lamp.png"));
        ListingChanges::restoring(&previous).apply_to(&mut current);
        assert_eq!(current, previous);
    }

    #[rstest]
    #[case(None, Some("furniture"))]
    #[case(Some("garden"), Some("furniture"))]
    #[case(Some("garden"), None)]
    fn restoring_puts_the_category_back(
        #[case] before: Option<&str>,
        #[case] after: Option<&str>,
    ) {
        let now = Utc::now();
        let previous = Listing {
            id: ListingId::random(),
            title: "Desk".into(),
            description: "Pine".into(),
            price: Price::new(30.0).expect("price"),
            image: Some(ImagePath::from_stored("/uploads/d-desk.png")),
            owner_email: OwnerEmail::new("a@b.c").expect("email"),
            category: before.map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        let mut current = previous.clone();
        current.category = after.map(str::to_owned);
        ListingChanges::restoring(&previous).apply_to(&mut current);
        assert_eq!(current.category.as_deref(), before);
    }
}
