//! Listing use-cases.
//!
//! Implements [`ListingsCommand`] and [`ListingsQuery`] on top of the listing
//! and comment repositories and the image store.
//!
//! Image files and listing rows live in different stores, so writes follow a
//! fixed sequence: stage the file, write the row, then publish the file. A
//! failed row write discards the staged file; a failed publish rolls the row
//! back. Replaced or orphaned published files are removed best-effort.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CommentRepository, ImageStore, ImageStoreError, ListingRepository,
    ListingRepositoryError, ListingsCommand, ListingsQuery, StagedImage,
};
use crate::domain::validation::{FieldName, missing_fields_error, non_blank};
use crate::domain::{
    CategoryChange, CreateListingRequest, Error, ImageChange, ImagePath, ImageUpload, Listing,
    ListingChanges, ListingId, OwnerEmail, Price, StoredFileName, UpdateListingRequest,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const PRICE: FieldName = FieldName::new("price");
const IMAGE: FieldName = FieldName::new("image");
const NEW_IMAGE: FieldName = FieldName::new("newImage");
const USER_EMAIL: FieldName = FieldName::new("userEmail");

/// Listing service implementing the listing driving ports.
#[derive(Clone)]
pub struct ListingService<L, C, I> {
    listings: Arc<L>,
    comments: Arc<C>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<L, C, I> ListingService<L, C, I> {
    pub fn new(listings: Arc<L>, comments: Arc<C>, images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            comments,
            images,
            clock,
        }
    }
}

/// Creation input after validation.
struct NewListing {
    title: String,
    description: String,
    price: Price,
    owner_email: OwnerEmail,
    category: Option<String>,
    image: ImageUpload,
}

fn validate_create(request: CreateListingRequest) -> Result<NewListing, Error> {
    let CreateListingRequest {
        title,
        description,
        price,
        image,
        owner_email,
        category,
    } = request;

    let title = non_blank(title);
    let description = non_blank(description);
    let price = non_blank(price);
    let owner_email = owner_email.and_then(OwnerEmail::new);
    let image = image.filter(|upload| !upload.bytes.is_empty());

    let missing: Vec<FieldName> = [
        (TITLE, title.is_none()),
        (DESCRIPTION, description.is_none()),
        (PRICE, price.is_none()),
        (IMAGE, image.is_none()),
        (USER_EMAIL, owner_email.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(title), Some(description), Some(price), Some(image), Some(owner_email)) =
        (title, description, price, image, owner_email)
    else {
        return Err(missing_fields_error(&missing));
    };

    let price = Price::parse(&price)?;
    image.ensure_allowed(IMAGE)?;

    Ok(NewListing {
        title,
        description,
        price,
        owner_email,
        category: non_blank(category),
        image,
    })
}

/// Validate the provided update fields; returns the changes plus the image to
/// stage, if any.
fn validate_update(
    request: UpdateListingRequest,
) -> Result<(ListingChanges, Option<ImageUpload>), Error> {
    let UpdateListingRequest {
        title,
        description,
        price,
        category,
        new_image,
        old_image: _,
    } = request;

    let blank: Vec<FieldName> = [(TITLE, &title), (DESCRIPTION, &description), (PRICE, &price)]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .is_some_and(|raw| raw.trim().is_empty())
                .then_some(field)
        })
        .collect();
    if !blank.is_empty() {
        return Err(missing_fields_error(&blank));
    }

    let price = price.as_deref().map(Price::parse).transpose()?;
    let new_image = new_image.filter(|upload| !upload.bytes.is_empty());
    if let Some(upload) = &new_image {
        upload.ensure_allowed(NEW_IMAGE)?;
    }

    let changes = ListingChanges {
        title: non_blank(title),
        description: non_blank(description),
        price,
        category: non_blank(category).map_or(CategoryChange::Keep, CategoryChange::Set),
        image: ImageChange::Keep,
        updated_at: None,
    };
    Ok((changes, new_image))
}

fn not_found(id: &ListingId) -> Error {
    Error::not_found(format!("topic {id} not found"))
}

fn map_listing_error(err: ListingRepositoryError) -> Error {
    error!(error = %err, "listing repository failure");
    Error::internal(err.to_string())
}

fn map_image_error(err: ImageStoreError) -> Error {
    error!(error = %err, "image store failure");
    Error::internal(err.to_string())
}

impl<L, C, I> ListingService<L, C, I>
where
    L: ListingRepository,
    C: CommentRepository,
    I: ImageStore,
{
    async fn stage(&self, upload: ImageUpload) -> Result<StagedImage, Error> {
        let file_name = StoredFileName::generate(&upload.original_name);
        self.images
            .stage(file_name, upload.bytes)
            .await
            .map_err(map_image_error)
    }

    async fn discard_quietly(&self, staged: &StagedImage) {
        if let Err(err) = self.images.discard(staged).await {
            warn!(error = %err, file = %staged.file_name(), "failed to discard staged image");
        }
    }

    async fn remove_quietly(&self, image: Option<&ImagePath>) {
        let Some(file_name) = image.and_then(ImagePath::file_name) else {
            return;
        };
        if let Err(err) = self.images.remove(&file_name).await {
            warn!(error = %err, file = %file_name, "failed to remove image");
        }
    }
}

#[async_trait]
impl<L, C, I> ListingsCommand for ListingService<L, C, I>
where
    L: ListingRepository,
    C: CommentRepository,
    I: ImageStore,
{
    async fn create(&self, request: CreateListingRequest) -> Result<Listing, Error> {
        let NewListing {
            title,
            description,
            price,
            owner_email,
            category,
            image,
        } = validate_create(request)?;

        let staged = self.stage(image).await?;
        let now = self.clock.utc();
        let listing = Listing {
            id: ListingId::random(),
            title,
            description,
            price,
            image: Some(staged.public_path()),
            owner_email,
            category,
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = self.listings.insert(&listing).await {
            self.discard_quietly(&staged).await;
            return Err(map_listing_error(err));
        }

        if let Err(err) = self.images.commit(&staged).await {
            if let Err(rollback) = self.listings.delete(&listing.id).await {
                error!(error = %rollback, listing_id = %listing.id, "failed to roll back listing");
            }
            self.discard_quietly(&staged).await;
            return Err(map_image_error(err));
        }

        info!(listing_id = %listing.id, "listing created");
        Ok(listing)
    }

    async fn update(&self, id: ListingId, request: UpdateListingRequest) -> Result<Listing, Error> {
        let claimed_old_image = request.old_image.clone();
        let (mut changes, new_image) = validate_update(request)?;

        let existing = self
            .listings
            .find_by_id(&id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| not_found(&id))?;

        if let Some(claimed) = claimed_old_image.as_deref().map(str::trim) {
            let stored = existing.image.as_ref().map_or("", ImagePath::as_str);
            if !claimed.is_empty() && claimed != stored {
                warn!(listing_id = %id, claimed, stored, "oldImage does not match stored image");
            }
        }

        if changes.is_empty() && new_image.is_none() {
            return Ok(existing);
        }

        let staged = match new_image {
            Some(upload) => Some(self.stage(upload).await?),
            None => None,
        };
        if let Some(staged) = &staged {
            changes.image = ImageChange::Set(staged.public_path());
        }
        changes.updated_at = Some(self.clock.utc());

        let updated = match self.listings.update(&id, &changes).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                if let Some(staged) = &staged {
                    self.discard_quietly(staged).await;
                }
                return Err(not_found(&id));
            }
            Err(err) => {
                if let Some(staged) = &staged {
                    self.discard_quietly(staged).await;
                }
                return Err(map_listing_error(err));
            }
        };

        if let Some(staged) = &staged {
            if let Err(err) = self.images.commit(staged).await {
                let restore = ListingChanges::restoring(&existing);
                if let Err(rollback) = self.listings.update(&id, &restore).await {
                    error!(error = %rollback, listing_id = %id, "failed to roll back listing update");
                }
                self.discard_quietly(staged).await;
                return Err(map_image_error(err));
            }
            self.remove_quietly(existing.image.as_ref()).await;
        }

        info!(listing_id = %id, "listing updated");
        Ok(updated)
    }

    async fn delete(&self, id: ListingId) -> Result<(), Error> {
        let removed = self
            .listings
            .delete(&id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| not_found(&id))?;

        // PostgreSQL cascades this; the in-memory adapter relies on it.
        if let Err(err) = self.comments.delete_for_listing(&id).await {
            warn!(error = %err, listing_id = %id, "failed to delete comments for listing");
        }
        self.remove_quietly(removed.image.as_ref()).await;

        info!(listing_id = %id, "listing deleted");
        Ok(())
    }
}

#[async_trait]
impl<L, C, I> ListingsQuery for ListingService<L, C, I>
where
    L: ListingRepository,
    C: CommentRepository,
    I: ImageStore,
{
    async fn list(&self) -> Result<Vec<Listing>, Error> {
        self.listings
            .list_newest_first()
            .await
            .map_err(map_listing_error)
    }

    async fn get(&self, id: ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(&id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(|| not_found(&id))
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
