//! Shared server state: the result cache, the remote collaborators, and one
//! paged-search orchestrator per named screen.

use std::collections::HashMap;
use std::sync::Arc;

use tcs_client::{ApiClient, MutationApi, SourceMutator};
use tcs_core::{AppConfig, CacheDb, Error, KeyValueStore, MemoryStore, PagedSearch, RemoteSearch, SourceResultCache};
use tokio::sync::Mutex;

/// Screen name used when a tool call does not give one.
pub const DEFAULT_SCREEN: &str = "default";

/// Upper bound on open screens. Closing one frees a slot.
pub const MAX_SCREENS: usize = 64;

pub type SharedStore = Arc<dyn KeyValueStore>;
pub type SharedCache = Arc<SourceResultCache<SharedStore>>;
pub type Screen = PagedSearch<Arc<dyn RemoteSearch>, SharedStore>;

pub struct AppState {
    pub cache: SharedCache,
    pub mutator: SourceMutator<Arc<dyn MutationApi>, SharedStore>,
    /// Set when the store is the SQLite database, for age-based purging.
    pub durable: Option<Arc<CacheDb>>,
    remote: Arc<dyn RemoteSearch>,
    default_page_size: u32,
    screens: Mutex<HashMap<String, Arc<Mutex<Screen>>>>,
}

impl AppState {
    pub fn new(
        store: SharedStore, durable: Option<Arc<CacheDb>>, remote: Arc<dyn RemoteSearch>,
        mutations: Arc<dyn MutationApi>, default_page_size: u32,
    ) -> Self {
        let cache = Arc::new(SourceResultCache::new(store));
        let mutator = SourceMutator::new(mutations, cache.clone());
        Self {
            cache,
            mutator,
            durable,
            remote,
            default_page_size,
            screens: Mutex::new(HashMap::new()),
        }
    }

    /// Open the configured store and API client.
    ///
    /// With `persist_cache` off the cache lives in memory and is lost on exit.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let api = Arc::new(ApiClient::from_app_config(config)?);

        let (store, durable): (SharedStore, Option<Arc<CacheDb>>) = if config.persist_cache {
            let db = Arc::new(CacheDb::open(&config.db_path).await?);
            tracing::info!(path = %config.db_path.display(), "opened cache database");
            let store: SharedStore = db.clone();
            (store, Some(db))
        } else {
            tracing::info!("using in-memory cache");
            let store: SharedStore = Arc::new(MemoryStore::new());
            (store, None)
        };

        Ok(Self::new(store, durable, api.clone(), api, config.default_page_size))
    }

    /// The orchestrator for `name`, created on first use.
    ///
    /// Each screen is locked for the duration of a load, so overlapping calls
    /// for one screen run one after the other.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when `name` is new and [`MAX_SCREENS`]
    /// screens are already open.
    pub async fn screen(&self, name: &str) -> Result<Arc<Mutex<Screen>>, Error> {
        let mut screens = self.screens.lock().await;
        if let Some(screen) = screens.get(name) {
            return Ok(screen.clone());
        }
        if screens.len() >= MAX_SCREENS {
            return Err(Error::InvalidInput(format!(
                "too many open screens (max {MAX_SCREENS}), close one with screen_close"
            )));
        }

        tracing::debug!(screen = name, "opening screen");
        let screen =
            Arc::new(Mutex::new(PagedSearch::new(self.remote.clone(), self.cache.clone(), self.default_page_size)));
        screens.insert(name.to_string(), screen.clone());
        Ok(screen)
    }

    /// Drop the screen called `name`. Cached pages are kept.
    pub async fn close_screen(&self, name: &str) -> bool {
        let closed = self.screens.lock().await.remove(name).is_some();
        if closed {
            tracing::debug!(screen = name, "closed screen");
        }
        closed
    }

    pub async fn screen_count(&self) -> usize {
        self.screens.lock().await.len()
    }

    /// Forget every screen and every page this process cached.
    pub async fn clear(&self) -> usize {
        self.screens.lock().await.clear();
        self.cache.clear_all().await
    }
}
