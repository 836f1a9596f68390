//! Filesystem image store backed by a capability-scoped directory.
//!
//! Files live directly in the upload directory under their final names.
//! Staged files go to a `.staging` subdirectory that is never served; committing
//! renames a staged file into place. The directory is created and opened once,
//! on first use, and shared by every request afterwards. All filesystem calls
//! run on the blocking thread pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::StoredFileName;
use crate::domain::ports::{ImageStore, ImageStoreError, StagedImage};

const STAGING_DIR: &str = ".staging";

/// [`ImageStore`] writing to a local directory through `cap-std`.
#[derive(Clone)]
pub struct CapStdImageStore {
    root: PathBuf,
    dir: Arc<OnceCell<Arc<Dir>>>,
}

impl CapStdImageStore {
    /// Create a store rooted at `root`. Nothing is touched until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir: Arc::new(OnceCell::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn dir(&self) -> Result<Arc<Dir>, ImageStoreError> {
        self.dir
            .get_or_try_init(|| async {
                let root = self.root.clone();
                let dir = tokio::task::spawn_blocking(move || open_upload_dir(&root))
                    .await
                    .map_err(|err| ImageStoreError::unavailable(err.to_string()))?
                    .map_err(|err| {
                        ImageStoreError::unavailable(format!("{}: {err}", self.root.display()))
                    })?;
                info!(path = %self.root.display(), "upload directory ready");
                Ok::<_, ImageStoreError>(Arc::new(dir))
            })
            .await
            .cloned()
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ImageStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = self.dir().await?;
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| ImageStoreError::io(err.to_string()))?
            .map_err(|err| ImageStoreError::io(err.to_string()))
    }
}

fn open_upload_dir(root: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(root, ambient_authority())?;
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    dir.create_dir_all(STAGING_DIR)?;
    Ok(dir)
}

fn staging_path(staging_name: &str) -> PathBuf {
    Path::new(STAGING_DIR).join(staging_name)
}

fn remove_if_exists(dir: &Dir, path: &Path) -> io::Result<()> {
    match dir.remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error),
    }
}

#[async_trait]
impl ImageStore for CapStdImageStore {
    async fn stage(
        &self,
        file_name: StoredFileName,
        bytes: Vec<u8>,
    ) -> Result<StagedImage, ImageStoreError> {
        let staging_name = format!("{}.part", Uuid::new_v4().simple());
        let path = staging_path(&staging_name);
        let len = bytes.len();
        self.run(move |dir| dir.write(&path, &bytes)).await?;
        debug!(file = %file_name, len, "image staged");
        Ok(StagedImage::new(staging_name, file_name))
    }

    async fn commit(&self, staged: &StagedImage) -> Result<(), ImageStoreError> {
        let from = staging_path(staged.staging_name());
        let to = PathBuf::from(staged.file_name().as_str());
        self.run(move |dir| dir.rename(&from, dir, &to)).await
    }

    async fn discard(&self, staged: &StagedImage) -> Result<(), ImageStoreError> {
        let path = staging_path(staged.staging_name());
        self.run(move |dir| remove_if_exists(dir, &path)).await
    }

    async fn remove(&self, file_name: &StoredFileName) -> Result<(), ImageStoreError> {
        let path = PathBuf::from(file_name.as_str());
        self.run(move |dir| remove_if_exists(dir, &path)).await
    }

    async fn read(&self, file_name: &StoredFileName) -> Result<Option<Vec<u8>>, ImageStoreError> {
        let path = PathBuf::from(file_name.as_str());
        self.run(move |dir| match dir.read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    fn store_in(temp: &TempDir) -> CapStdImageStore {
        CapStdImageStore::new(temp.path().join("public").join("uploads"))
    }

    #[rstest]
    #[tokio::test]
    async fn staged_files_are_invisible_until_committed(temp: TempDir) {
        let store = store_in(&temp);
        let name = StoredFileName::generate("cat.png");
        let staged = store
            .stage(name.clone(), b"png-bytes".to_vec())
            .await
            .expect("stage");

        assert_eq!(store.read(&name).await.expect("read"), None);
        store.commit(&staged).await.expect("commit");
        assert_eq!(
            store.read(&name).await.expect("read"),
            Some(b"png-bytes".to_vec())
        );
        assert!(store.root().join(name.as_str()).exists());
    }

    #[rstest]
    #[tokio::test]
    async fn discard_and_remove_tolerate_missing_files(temp: TempDir) {
        let store = store_in(&temp);
        let name = StoredFileName::generate("dog.gif");
        let staged = store.stage(name.clone(), vec![1, 2, 3]).await.expect("stage");

        store.discard(&staged).await.expect("discard");
        store.discard(&staged).await.expect("second discard");
        store.remove(&name).await.expect("remove missing");
        assert!(store.commit(&staged).await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_a_committed_file(temp: TempDir) {
        let store = store_in(&temp);
        let name = StoredFileName::generate("bird.jpg");
        let staged = store.stage(name.clone(), vec![9]).await.expect("stage");
        store.commit(&staged).await.expect("commit");

        store.remove(&name).await.expect("remove");
        assert_eq!(store.read(&name).await.expect("read"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn clones_share_one_directory_handle(temp: TempDir) {
        let store = store_in(&temp);
        let clone = store.clone();
        let (a, b) = tokio::join!(store.dir(), clone.dir());
        let (a, b) = (a.expect("dir"), b.expect("dir"));
        assert!(Arc::ptr_eq(&a, &b));
    }
}
