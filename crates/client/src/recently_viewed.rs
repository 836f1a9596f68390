//! Recently viewed listings, capped and persisted as JSON.
//!
//! Entries are ordered oldest first. Recording an id that is already present
//! changes nothing; recording a new id at capacity evicts the oldest entry.
//! The store keeps one JSON array in a file under a caller-chosen directory,
//! accessed through `cap-std` on the blocking thread pool.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::ClientError;
use crate::model::Topic;

/// Most entries the history keeps.
pub const RECENTLY_VIEWED_CAPACITY: usize = 10;

const FILE_NAME: &str = "recently_viewed.json";

/// In-memory recently-viewed history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentlyViewed {
    entries: VecDeque<Topic>,
}

impl RecentlyViewed {
    /// An empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from stored entries, enforcing the cap and dropping
    /// later duplicates.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Topic>) -> Self {
        let mut history = Self::new();
        for topic in entries {
            history.record(topic);
        }
        history
    }

    /// Record a viewed listing. Returns `false` when the id was already
    /// present.
    pub fn record(&mut self, topic: Topic) -> bool {
        if self.contains(topic.id) {
            return false;
        }
        if self.entries.len() >= RECENTLY_VIEWED_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(topic);
        true
    }

    /// Whether a listing with `id` is recorded.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &Topic> {
        self.entries.iter()
    }

    /// Number of recorded listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File-backed persistence for [`RecentlyViewed`].
#[derive(Debug, Clone)]
pub struct RecentlyViewedStore {
    dir: PathBuf,
}

impl RecentlyViewedStore {
    /// Store the history under `dir`, created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the history file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the stored history. A missing or unreadable file yields an empty
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the directory or file cannot be
    /// read.
    pub async fn load(&self) -> Result<RecentlyViewed, ClientError> {
        let dir = self.dir.clone();
        let raw = run_blocking(move || read_if_exists(&dir)).await?;
        let Some(raw) = raw else {
            return Ok(RecentlyViewed::new());
        };
        match serde_json::from_slice::<Vec<Topic>>(&raw) {
            Ok(entries) => Ok(RecentlyViewed::from_entries(entries)),
            Err(error) => {
                warn!(%error, path = %self.dir.display(), "discarding corrupt recently-viewed file");
                Ok(RecentlyViewed::new())
            }
        }
    }

    /// Write `history`, creating the directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] when the file cannot be written.
    pub async fn save(&self, history: &RecentlyViewed) -> Result<(), ClientError> {
        let json =
            serde_json::to_vec(history).map_err(|err| ClientError::storage(err.to_string()))?;
        let dir = self.dir.clone();
        run_blocking(move || {
            Dir::create_ambient_dir_all(&dir, ambient_authority())?;
            Dir::open_ambient_dir(&dir, ambient_authority())?.write(FILE_NAME, &json)
        })
        .await
    }

    /// Load, record `topic`, and persist when it was new.
    ///
    /// # Errors
    ///
    /// Propagates [`RecentlyViewedStore::load`] and
    /// [`RecentlyViewedStore::save`] failures.
    pub async fn record(&self, topic: Topic) -> Result<RecentlyViewed, ClientError> {
        let mut history = self.load().await?;
        if history.record(topic) {
            self.save(&history).await?;
        }
        Ok(history)
    }
}

fn read_if_exists(dir: &Path) -> io::Result<Option<Vec<u8>>> {
    let dir = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(dir) => dir,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error),
    };
    match dir.read(FILE_NAME) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, ClientError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|err| ClientError::storage(err.to_string()))?
        .map_err(|err| ClientError::storage(err.to_string()))
}
