//! Listing detail page state.
//!
//! Loading fetches the listing, then its comments, then records the listing
//! in the recently-viewed history. Once loaded the view owns a comment
//! composer and an image preview toggle. Server calls that fail leave local
//! state untouched.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::DEFAULT_IMAGE_PATH;
use crate::api::MarketplaceApi;
use crate::error::ClientError;
use crate::model::{Comment, NewComment, Topic};
use crate::recently_viewed::RecentlyViewedStore;

/// What submitting the composer does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposerMode {
    /// Post a new comment.
    #[default]
    Create,
    /// Replace the content of the comment with this id.
    Edit(Uuid),
}

/// Draft text plus whether submitting creates or edits a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentComposer {
    draft: String,
    mode: ComposerMode,
}

impl CommentComposer {
    /// Current draft text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Current submit mode.
    #[must_use]
    pub const fn mode(&self) -> ComposerMode {
        self.mode
    }

    fn reset(&mut self) {
        self.draft.clear();
        self.mode = ComposerMode::Create;
    }
}

/// Full-size image overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImagePreview {
    /// Overlay hidden.
    #[default]
    Closed,
    /// Overlay showing the image at this path.
    Open(String),
}

/// Everything shown once a listing has loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDetail {
    /// The listing.
    pub topic: Topic,
    /// Newest first.
    pub comments: Vec<Comment>,
    /// Comment draft and mode.
    pub composer: CommentComposer,
    /// Image overlay state.
    pub preview: ImagePreview,
}

/// Lifecycle of the detail page.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    /// Fetch in progress.
    Loading,
    /// The listing could not be fetched.
    NotFound,
    /// The listing and its comments are available.
    Loaded(Box<LoadedDetail>),
}

/// State machine behind the listing detail page.
pub struct DetailView<A: ?Sized> {
    api: Arc<A>,
    history: RecentlyViewedStore,
    viewer_email: Option<String>,
    state: DetailState,
}

impl<A> DetailView<A>
where
    A: MarketplaceApi + ?Sized,
{
    /// A view in [`DetailState::Loading`]; `viewer_email` is `None` when
    /// nobody is signed in.
    #[must_use]
    pub const fn new(
        api: Arc<A>,
        history: RecentlyViewedStore,
        viewer_email: Option<String>,
    ) -> Self {
        Self {
            api,
            history,
            viewer_email,
            state: DetailState::Loading,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DetailState {
        &self.state
    }

    /// The loaded detail, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    fn loaded_mut(&mut self) -> Option<&mut LoadedDetail> {
        match &mut self.state {
            DetailState::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    /// Fetch the listing and its comments.
    ///
    /// Any failure to fetch the listing ends in [`DetailState::NotFound`]. A
    /// failed comment fetch still shows the listing, with no comments, and
    /// skips the history update.
    pub async fn load(&mut self, id: Uuid) {
        self.state = DetailState::Loading;
        let topic = match self.api.get_topic(id).await {
            Ok(topic) => topic,
            Err(error) => {
                if !error.is_not_found() {
                    warn!(%error, %id, "failed to fetch listing");
                }
                self.state = DetailState::NotFound;
                return;
            }
        };

        let comments = match self.api.list_comments(id).await {
            Ok(comments) => {
                if let Err(error) = self.history.record(topic.clone()).await {
                    warn!(%error, %id, "failed to update recently viewed listings");
                }
                comments
            }
            Err(error) => {
                warn!(%error, %id, "failed to fetch comments");
                Vec::new()
            }
        };

        self.state = DetailState::Loaded(Box::new(LoadedDetail {
            topic,
            comments,
            composer: CommentComposer::default(),
            preview: ImagePreview::Closed,
        }));
    }

    /// Whether the viewer owns the loaded listing.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        match (self.loaded(), self.viewer_email.as_deref()) {
            (Some(detail), Some(email)) => detail.topic.user_email == email,
            _ => false,
        }
    }

    /// Replace the composer draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(detail) = self.loaded_mut() {
            detail.composer.draft = text.into();
        }
    }

    /// Switch the composer to editing `comment_id`, copying its content into
    /// the draft. Unknown ids are ignored.
    pub fn begin_edit(&mut self, comment_id: Uuid) {
        let Some(detail) = self.loaded_mut() else {
            return;
        };
        let Some(comment) = detail.comments.iter().find(|c| c.id == comment_id) else {
            return;
        };
        detail.composer.draft = comment.content.clone();
        detail.composer.mode = ComposerMode::Edit(comment_id);
    }

    /// Clear the draft and return to create mode.
    pub fn cancel_edit(&mut self) {
        if let Some(detail) = self.loaded_mut() {
            detail.composer.reset();
        }
    }

    /// Submit the draft. Blank drafts are ignored.
    ///
    /// # Errors
    /// Returns the API error unchanged; local state is kept as it was.
    pub async fn submit_comment(&mut self) -> Result<(), ClientError> {
        let api = Arc::clone(&self.api);
        let viewer_email = self.viewer_email.clone().unwrap_or_default();
        let Some(detail) = self.loaded_mut() else {
            return Ok(());
        };
        if detail.composer.draft.trim().is_empty() {
            return Ok(());
        }
        let content = detail.composer.draft.clone();

        match detail.composer.mode {
            ComposerMode::Edit(id) => {
                let updated = api.update_comment(id, content).await.inspect_err(|error| {
                    warn!(%error, comment_id = %id, "failed to update comment");
                })?;
                if let Some(slot) = detail.comments.iter_mut().find(|c| c.id == id) {
                    *slot = updated;
                }
            }
            ComposerMode::Create => {
                let created = api
                    .create_comment(NewComment {
                        content,
                        user_email: viewer_email,
                        topic_id: detail.topic.id,
                    })
                    .await
                    .inspect_err(|error| warn!(%error, "failed to create comment"))?;
                detail.comments.insert(0, created);
            }
        }
        detail.composer.reset();
        Ok(())
    }

    /// Delete a comment, removing it locally once the server confirms.
    ///
    /// # Errors
    /// Returns the API error unchanged; the comment stays in the list.
    pub async fn delete_comment(&mut self, comment_id: Uuid) -> Result<(), ClientError> {
        let api = Arc::clone(&self.api);
        api.delete_comment(comment_id)
            .await
            .inspect_err(|error| warn!(%error, %comment_id, "failed to delete comment"))?;
        if let Some(detail) = self.loaded_mut() {
            detail.comments.retain(|c| c.id != comment_id);
            if detail.composer.mode == ComposerMode::Edit(comment_id) {
                detail.composer.reset();
            }
        }
        Ok(())
    }

    /// Open the preview on the listing image, or the placeholder when the
    /// listing has none.
    pub fn open_preview(&mut self) {
        if let Some(detail) = self.loaded_mut() {
            let path = detail
                .topic
                .image
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_PATH.to_owned());
            detail.preview = ImagePreview::Open(path);
        }
    }

    /// Hide the image overlay.
    pub fn close_preview(&mut self) {
        if let Some(detail) = self.loaded_mut() {
            detail.preview = ImagePreview::Closed;
        }
    }
}

#[cfg(test)]
#[path = "detail_view_tests.rs"]
mod tests;
