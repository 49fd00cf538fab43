//! The client facade: wiring and lifecycle.

use std::sync::Arc;

use tracing::info;

use plaza_auth::account::AccountManager;
use plaza_auth::session::bridge::AuthEventBridge;
use plaza_auth::session::monitor::{InactivityMonitor, InteractionKind};
use plaza_auth::session::store::SessionStore;
use plaza_backend::{RestAuthProvider, RestObjectStore, RestTableClient, WsChangeFeed};
use plaza_core::config::PlazaConfig;
use plaza_core::error::AppError;
use plaza_core::traits::auth::AuthProvider;
use plaza_core::traits::changefeed::ChangeFeed;
use plaza_core::traits::storage::ObjectStore;
use plaza_core::traits::table::TableClient;
use plaza_realtime::ChangeBridge;
use plaza_service::{
    CommentService, ImageService, InterestService, LikeService, MentionResolver, PostService,
    ProfileService, ReportService,
};

/// The assembled Plaza client.
///
/// Owns the session store, the inactivity monitor, the auth event bridge,
/// the realtime bridge, and every domain service, all speaking to the same
/// backend adapters. Construct with [`PlazaClient::connect`] (live backend)
/// or [`PlazaClient::with_backend`] (injected collaborators).
#[derive(Debug)]
pub struct PlazaClient {
    store: Arc<SessionStore>,
    monitor: Arc<InactivityMonitor>,
    bridge: AuthEventBridge,
    account: AccountManager,
    realtime: ChangeBridge,
    posts: PostService,
    comments: CommentService,
    likes: LikeService,
    profiles: Arc<ProfileService>,
    interests: InterestService,
    reports: ReportService,
    images: ImageService,
    mentions: MentionResolver,
}

impl PlazaClient {
    /// Builds a client against the configured hosted backend.
    pub fn connect(config: PlazaConfig) -> Result<Self, AppError> {
        let auth: Arc<dyn AuthProvider> = Arc::new(RestAuthProvider::new(&config.backend)?);
        let tables: Arc<dyn TableClient> = Arc::new(RestTableClient::new(&config.backend)?);
        let feed: Arc<dyn ChangeFeed> =
            Arc::new(WsChangeFeed::new(&config.backend, &config.realtime));
        let objects: Arc<dyn ObjectStore> =
            Arc::new(RestObjectStore::new(&config.backend, &config.storage)?);
        Ok(Self::with_backend(config, auth, tables, feed, objects))
    }

    /// Builds a client over injected collaborators (tests, embedders with
    /// their own transports).
    pub fn with_backend(
        config: PlazaConfig,
        auth: Arc<dyn AuthProvider>,
        tables: Arc<dyn TableClient>,
        feed: Arc<dyn ChangeFeed>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let store = SessionStore::new();
        let monitor = InactivityMonitor::new(store.clone(), auth.clone(), &config.session);
        let bridge = AuthEventBridge::new(store.clone(), monitor.clone(), auth.clone());
        let profiles = Arc::new(ProfileService::new(tables.clone()));
        let account = AccountManager::new(
            auth,
            tables.clone(),
            profiles.clone(),
            store.clone(),
            monitor.clone(),
            &config.session,
        );
        let realtime = ChangeBridge::new(tables.clone(), feed);
        let mentions = MentionResolver::new(profiles.clone());

        Self {
            store,
            monitor,
            bridge,
            account,
            realtime,
            posts: PostService::new(tables.clone()),
            comments: CommentService::new(tables.clone()),
            likes: LikeService::new(tables.clone()),
            profiles,
            interests: InterestService::new(tables.clone()),
            reports: ReportService::new(tables),
            images: ImageService::new(objects, config.storage.clone()),
            mentions,
        }
    }

    /// Starts the client: begins consuming provider auth events, accepts
    /// interaction signals, and restores any persisted session (arming the
    /// inactivity monitor when one exists). Returns whether a session was
    /// restored.
    pub async fn initialize(&self) -> bool {
        info!("Initializing Plaza client");
        self.bridge.start();
        self.monitor.mount();
        self.account.restore().await
    }

    /// Stops event consumption and interaction handling and cancels any
    /// pending inactivity timer. The local session is left as-is.
    pub fn shutdown(&self) {
        self.bridge.stop();
        self.monitor.unmount();
        self.monitor.disarm();
    }

    /// Feeds a user-interaction signal to the inactivity monitor.
    pub fn record_activity(&self, kind: InteractionKind) {
        self.monitor.record_activity(kind);
    }

    /// The session store (subscribe / current-session snapshots).
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The inactivity monitor.
    pub fn monitor(&self) -> &Arc<InactivityMonitor> {
        &self.monitor
    }

    /// Account workflows (register, login, logout, password change).
    pub fn account(&self) -> &AccountManager {
        &self.account
    }

    /// Realtime subscriptions for posts and comments.
    pub fn realtime(&self) -> &ChangeBridge {
        &self.realtime
    }

    /// Post CRUD.
    pub fn posts(&self) -> &PostService {
        &self.posts
    }

    /// Comment CRUD.
    pub fn comments(&self) -> &CommentService {
        &self.comments
    }

    /// Like operations.
    pub fn likes(&self) -> &LikeService {
        &self.likes
    }

    /// Profile operations.
    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    /// Interest operations.
    pub fn interests(&self) -> &InterestService {
        &self.interests
    }

    /// Moderation reports.
    pub fn reports(&self) -> &ReportService {
        &self.reports
    }

    /// Image uploads.
    pub fn images(&self) -> &ImageService {
        &self.images
    }

    /// Mention parsing and resolution.
    pub fn mentions(&self) -> &MentionResolver {
        &self.mentions
    }
}
