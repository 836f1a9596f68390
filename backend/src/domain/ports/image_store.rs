//! Driven port for image file storage.
//!
//! Writes happen in two phases. [`ImageStore::stage`] writes the bytes under
//! a temporary name that is never served; [`ImageStore::commit`] renames the
//! staged file to its final name. Callers persist the final public path
//! between the two phases and call [`ImageStore::discard`] when the record
//! write fails.

use async_trait::async_trait;

use crate::domain::{ImagePath, StoredFileName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The upload directory could not be opened or created.
        Unavailable { message: String } =>
            "image store unavailable: {message}",
        /// Reading, writing, or renaming a file failed.
        Io { message: String } =>
            "image store I/O failed: {message}",
    }
}

/// An image written to the staging area but not yet published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    staging_name: String,
    file_name: StoredFileName,
}

impl StagedImage {
    pub fn new(staging_name: impl Into<String>, file_name: StoredFileName) -> Self {
        Self {
            staging_name: staging_name.into(),
            file_name,
        }
    }

    /// Name of the temporary file inside the staging area.
    pub fn staging_name(&self) -> &str {
        &self.staging_name
    }

    /// Name the file takes once committed.
    pub fn file_name(&self) -> &StoredFileName {
        &self.file_name
    }

    /// Public path the file is served under once committed.
    pub fn public_path(&self) -> ImagePath {
        self.file_name.public_path()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn stage(
        &self,
        file_name: StoredFileName,
        bytes: Vec<u8>,
    ) -> Result<StagedImage, ImageStoreError>;

    async fn commit(&self, staged: &StagedImage) -> Result<(), ImageStoreError>;

    /// Remove a staged file. A file that is already gone is not an error.
    async fn discard(&self, staged: &StagedImage) -> Result<(), ImageStoreError>;

    /// Remove a published file. A file that is already gone is not an error.
    async fn remove(&self, file_name: &StoredFileName) -> Result<(), ImageStoreError>;

    /// Read a published file, `None` when it does not exist.
    async fn read(&self, file_name: &StoredFileName) -> Result<Option<Vec<u8>>, ImageStoreError>;
}
