//! Server harness and shared world for marketplace behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs on an ephemeral port
//! over in-memory repositories and a temporary upload directory, and is
//! driven through `marketplace-client`. Dropping the [`WorldFixture`] stops
//! the server even if a step panics.

use std::cell::RefCell;
use std::future::Future;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use url::Url;

use marketplace::Trace;
use marketplace::domain::{CommentService, ListingService};
use marketplace::inbound::http::configure;
use marketplace::inbound::http::multipart::UploadLimits;
use marketplace::inbound::http::state::{HttpState, HttpStatePorts};
use marketplace::outbound::memory::{MemoryCommentRepository, MemoryListingRepository};
use marketplace::outbound::uploads::CapStdImageStore;
use marketplace_client::{
    ClientConfig, ClientError, Comment, ImageFile, MarketplaceClient, NewTopic, Topic,
};

pub(crate) const SELLER: &str = "seller@example.com";
pub(crate) const BUYER: &str = "buyer@example.com";
pub(crate) const PNG: &[u8] = b"\x89PNG\r\n\x1a\nbehaviour";

/// Mutable scenario state.
#[derive(Default)]
pub(crate) struct Observations {
    pub(crate) topic: Option<Topic>,
    pub(crate) topics: Vec<Topic>,
    pub(crate) comment: Option<Comment>,
    pub(crate) error: Option<ClientError>,
}

pub(crate) struct WorldFixture {
    runtime: Runtime,
    local: LocalSet,
    server: ServerHandle,
    client: Arc<MarketplaceClient>,
    upload_root: TempDir,
    client_data: TempDir,
    pub(crate) observed: RefCell<Observations>,
}

impl WorldFixture {
    /// Drive `operation` to completion on the harness runtime.
    pub(crate) fn run<R, F>(&self, operation: impl FnOnce(Arc<MarketplaceClient>) -> F) -> R
    where
        F: Future<Output = R>,
    {
        self.local
            .block_on(&self.runtime, operation(self.client.clone()))
    }

    pub(crate) fn stored_images(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.upload_root.path().join("uploads")) else {
            return Vec::new();
        };
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect()
    }

    pub(crate) fn client_data_dir(&self) -> PathBuf {
        self.client_data.path().to_path_buf()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let server = self.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}

pub(crate) fn new_topic(title: &str, price: &str) -> NewTopic {
    NewTopic {
        title: title.to_owned(),
        description: "Sturdy and barely used".to_owned(),
        price: price.to_owned(),
        image: ImageFile {
            file_name: "chair.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: PNG.to_vec(),
        },
        user_email: SELLER.to_owned(),
        category: Some("furniture".to_owned()),
    }
}

fn in_memory_state(upload_root: &TempDir) -> HttpState {
    let listings = Arc::new(MemoryListingRepository::new());
    let comments = Arc::new(MemoryCommentRepository::linked_to(listings.clone()));
    let images = Arc::new(CapStdImageStore::new(upload_root.path().join("uploads")));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let listing_service = Arc::new(ListingService::new(
        listings.clone(),
        comments.clone(),
        images.clone(),
        clock.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(comments, listings, clock));

    HttpState::new(
        HttpStatePorts {
            listings: listing_service.clone(),
            listings_query: listing_service,
            comments: comment_service.clone(),
            comments_query: comment_service,
            images,
        },
        UploadLimits::default(),
    )
}

async fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Trace)
            .configure(configure)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let upload_root = tempfile::tempdir().expect("upload dir");
    let client_data = tempfile::tempdir().expect("client data dir");

    let state = in_memory_state(&upload_root);
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state))
        .expect("server should start");
    let client = MarketplaceClient::new(ClientConfig::new(
        Url::parse(&base_url).expect("base url"),
    ))
    .expect("client");

    WorldFixture {
        runtime,
        local,
        server,
        client: Arc::new(client),
        upload_root,
        client_data,
        observed: RefCell::new(Observations::default()),
    }
}
