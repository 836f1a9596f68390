//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{
    CategoryChange, ImageChange, ImagePath, Listing, ListingChanges, ListingId, OwnerEmail, Price,
};

use super::diesel_helpers::{classify_diesel_error, classify_pool_error};
use super::models::{ListingChangeset, ListingRow, NewListingRow};
use super::pool::DbPool;
use super::schema::listings;

/// Diesel-backed implementation of the [`ListingRepository`] port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a row into a domain listing, rejecting rows that break invariants.
fn row_to_listing(row: ListingRow) -> Result<Listing, ListingRepositoryError> {
    let Some(price) = Price::new(row.price) else {
        warn!(listing_id = %row.id, price = row.price, "stored listing has invalid price");
        return Err(ListingRepositoryError::query("stored listing has invalid price"));
    };
    let Some(owner_email) = OwnerEmail::new(row.owner_email) else {
        warn!(listing_id = %row.id, "stored listing has blank owner email");
        return Err(ListingRepositoryError::query("stored listing has blank owner email"));
    };
    Ok(Listing {
        id: ListingId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        price,
        image: row.image.map(ImagePath::from_stored),
        owner_email,
        category: row.category,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_changeset(changes: &ListingChanges) -> ListingChangeset<'_> {
    ListingChangeset {
        title: changes.title.as_deref(),
        description: changes.description.as_deref(),
        price: changes.price.map(Price::value),
        category: match &changes.category {
            CategoryChange::Keep => None,
            CategoryChange::Set(category) => Some(Some(category.as_str())),
            CategoryChange::Clear => Some(None),
        },
        image: match &changes.image {
            ImageChange::Keep => None,
            ImageChange::Set(path) => Some(Some(path.as_str())),
            ImageChange::Clear => Some(None),
        },
        updated_at: changes.updated_at,
    }
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row = NewListingRow {
            id: *listing.id.as_uuid(),
            title: &listing.title,
            description: &listing.description,
            price: listing.price.value(),
            image: listing.image.as_ref().map(ImagePath::as_str),
            owner_email: listing.owner_email.as_str(),
            category: listing.category.as_deref(),
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        };

        diesel::insert_into(listings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| classify_diesel_error(err, "insert listing").into())
    }

    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let rows: Vec<ListingRow> = listings::table
            .order(listings::created_at.desc())
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| classify_diesel_error(err, "list listings"))?;
        rows.into_iter().map(row_to_listing).collect()
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row: Option<ListingRow> = listings::table
            .find(id.as_uuid())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| classify_diesel_error(err, "find listing"))?;
        row.map(row_to_listing).transpose()
    }

    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        if changes.is_empty() && changes.updated_at.is_none() {
            return self.find_by_id(id).await;
        }
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row: Option<ListingRow> = diesel::update(listings::table.find(id.as_uuid()))
            .set(&to_changeset(changes))
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| classify_diesel_error(err, "update listing"))?;
        row.map(row_to_listing).transpose()
    }

    async fn delete(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(classify_pool_error)?;
        let row: Option<ListingRow> = diesel::delete(listings::table.find(id.as_uuid()))
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| classify_diesel_error(err, "delete listing"))?;
        row.map(row_to_listing).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(price: f64, owner_email: &str) -> ListingRow {
        let now = Utc::now();
        ListingRow {
            id: Uuid::new_v4(),
            title: "Bike".to_owned(),
            description: "Road bike".to_owned(),
            price,
            image: Some("/uploads/a-bike.jpg".to_owned()),
            owner_email: owner_email.to_owned(),
            category: Some("sport".to_owned()),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn valid_rows_convert() {
        let listing = row_to_listing(row(120.0, "rider@example.com")).expect("valid row");
        assert_eq!(listing.title, "Bike");
        assert_eq!(
            listing.image.as_ref().map(ImagePath::as_str),
            Some("/uploads/a-bike.jpg")
        );
    }

    #[rstest]
    #[case(0.0, "rider@example.com")]
    #[case(10.0, "  ")]
    fn rows_breaking_invariants_are_query_errors(#[case] price: f64, #[case] email: &str) {
        let err = row_to_listing(row(price, email)).expect_err("invalid row");
        assert!(matches!(err, ListingRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(ImageChange::Keep, None)]
    #[case(ImageChange::Clear, Some(None))]
    #[case(ImageChange::Set(ImagePath::from_stored("/uploads/n.png")), Some(Some("/uploads/n.png")))]
    fn image_changes_map_onto_nullable_column(
        #[case] image: ImageChange,
        #[case] expected: Option<Option<&str>>,
    ) {
        let changes = ListingChanges {
            image,
            ..ListingChanges::default()
        };
        assert_eq!(to_changeset(&changes).image, expected);
    }

    #[rstest]
    #[case(CategoryChange::Keep, None)]
    #[case(CategoryChange::Clear, Some(None))]
    #[case(CategoryChange::Set("sport".to_owned()), Some(Some("sport")))]
    fn category_changes_map_onto_nullable_column(
        #[case] category: CategoryChange,
        #[case] expected: Option<Option<&str>>,
    ) {
        let changes = ListingChanges {
            category,
            ..ListingChanges::default()
        };
        assert_eq!(to_changeset(&changes).category, expected);
    }
}
