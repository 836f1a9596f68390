//! Listing list and owner dashboard state.

use std::sync::Arc;

use tracing::warn;

use crate::api::MarketplaceApi;
use crate::model::Topic;

/// Lifecycle of a listing list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Fetch in progress.
    Loading,
    /// Fetched listings, newest first.
    Ready(Vec<Topic>),
    /// Plain-text failure message.
    Failed(String),
}

/// Every listing, newest first.
pub struct ListView<A: ?Sized> {
    api: Arc<A>,
    state: ListState,
}

impl<A> ListView<A>
where
    A: MarketplaceApi + ?Sized,
{
    /// A view in [`ListState::Loading`].
    #[must_use]
    pub const fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: ListState::Loading,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    /// Fetch every listing.
    pub async fn load(&mut self) {
        self.state = ListState::Loading;
        self.state = fetch(self.api.as_ref(), |_| true).await;
    }
}

/// The viewer's own listings, filtered client-side from the full list.
pub struct DashboardView<A: ?Sized> {
    api: Arc<A>,
    owner_email: String,
    state: ListState,
}

impl<A> DashboardView<A>
where
    A: MarketplaceApi + ?Sized,
{
    /// A view over listings owned by `owner_email`.
    #[must_use]
    pub fn new(api: Arc<A>, owner_email: impl Into<String>) -> Self {
        Self {
            api,
            owner_email: owner_email.into(),
            state: ListState::Loading,
        }
    }

    /// Email the dashboard filters on.
    #[must_use]
    pub fn owner_email(&self) -> &str {
        &self.owner_email
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ListState {
        &self.state
    }

    /// Fetch every listing and keep the owner's.
    pub async fn load(&mut self) {
        self.state = ListState::Loading;
        let owner = self.owner_email.as_str();
        self.state = fetch(self.api.as_ref(), |topic| topic.user_email == owner).await;
    }
}

async fn fetch<A>(api: &A, keep: impl Fn(&Topic) -> bool) -> ListState
where
    A: MarketplaceApi + ?Sized,
{
    match api.list_topics().await {
        Ok(topics) => ListState::Ready(topics.into_iter().filter(|t| keep(t)).collect()),
        Err(error) => {
            warn!(%error, "failed to fetch listings");
            ListState::Failed(error.to_string())
        }
    }
}
