//! In-memory `ListingRepository`.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{Listing, ListingChanges, ListingId};

use super::POISONED;

/// Listings kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryListingRepository {
    rows: RwLock<Vec<Listing>>,
}

impl MemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn contains(&self, id: &ListingId) -> Result<bool, ListingRepositoryError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().any(|row| &row.id == id))
    }
}

fn poisoned<T>(_: T) -> ListingRepositoryError {
    ListingRepositoryError::query(POISONED)
}

#[async_trait]
impl ListingRepository for MemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.iter().any(|row| row.id == listing.id) {
            return Err(ListingRepositoryError::query(format!(
                "listing {} already exists",
                listing.id
            )));
        }
        rows.push(listing.clone());
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingRepositoryError> {
        let rows = self.rows.read().map_err(poisoned)?;
        // Reverse first so equal timestamps keep the later insert in front.
        let mut listings: Vec<Listing> = rows.iter().rev().cloned().collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    async fn update(
        &self,
        id: &ListingId,
        changes: &ListingChanges,
    ) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        Ok(rows.iter_mut().find(|row| &row.id == id).map(|row| {
            changes.apply_to(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: &ListingId) -> Result<Option<Listing>, ListingRepositoryError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        Ok(rows
            .iter()
            .position(|row| &row.id == id)
            .map(|index| rows.remove(index)))
    }
}
