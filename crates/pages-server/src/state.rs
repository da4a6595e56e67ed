//! Application State

use std::sync::Arc;

use pages_core::{AssetUrlBase, UserIdentity};
use pages_publish::{
    ContactNotifier, MemoryObjectStore, MemoryRecordStore, ObjectStore, PageResolver, Publisher,
    RecordStore, SessionProvider, SimulatedNotifier, StaticSessions,
};
use pages_runtime::{ConfigError, SupabaseBackend, SupabaseConfig};

use crate::config::{BackendKind, ServerConfig};

/// The three backend collaborators
#[derive(Clone)]
pub struct Backends {
    pub objects: Arc<dyn ObjectStore>,
    pub records: Arc<dyn RecordStore>,
    pub sessions: Arc<dyn SessionProvider>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Upload & persist pipeline
    pub publisher: Publisher,

    /// Slug → public page
    pub resolver: PageResolver,

    pub records: Arc<dyn RecordStore>,

    pub sessions: Arc<dyn SessionProvider>,

    /// Visitor contact delivery (simulated)
    pub notifier: Arc<dyn ContactNotifier>,

    /// Objects served under `/assets` (memory backend only)
    pub local_assets: Option<Arc<dyn ObjectStore>>,

    /// Backend name reported by `/health`
    pub backend: String,
}

impl AppState {
    pub fn new(
        backends: Backends,
        assets: AssetUrlBase,
        notifier: Arc<dyn ContactNotifier>,
    ) -> Self {
        let backend = backends.records.name().to_string();
        Self {
            publisher: Publisher::new(backends.objects.clone(), backends.records.clone()),
            resolver: PageResolver::new(backends.records.clone(), assets),
            records: backends.records,
            sessions: backends.sessions,
            notifier,
            local_assets: None,
            backend,
        }
    }

    /// Serve the object store's contents under `/assets`
    pub fn serving_assets(mut self, objects: Arc<dyn ObjectStore>) -> Self {
        self.local_assets = Some(objects);
        self
    }

    /// In-process stores; assets are served by this server
    pub fn memory(
        store_root: &str,
        sessions: StaticSessions,
        notifier: Arc<dyn ContactNotifier>,
    ) -> Self {
        let objects: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
        let backends = Backends {
            objects: objects.clone(),
            records: Arc::new(MemoryRecordStore::new()),
            sessions: Arc::new(sessions),
        };
        let prefix = format!("{}/assets", store_root.trim_end_matches('/'));
        let assets = AssetUrlBase::from_prefix(&prefix);
        Self::new(backends, assets, notifier).serving_assets(objects)
    }

    pub fn supabase(
        config: SupabaseConfig,
        store_root: Option<&str>,
        notifier: Arc<dyn ContactNotifier>,
    ) -> Self {
        let backend = Arc::new(SupabaseBackend::new(config.clone()));
        let assets = match store_root {
            Some(root) => AssetUrlBase::for_bucket(root, &config.bucket),
            None => backend.asset_base(),
        };
        let backends = Backends {
            objects: backend.clone(),
            records: backend.clone(),
            sessions: backend,
        };
        Self::new(backends, assets, notifier)
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let notifier: Arc<dyn ContactNotifier> =
            Arc::new(SimulatedNotifier::new(config.contact_delay));

        match config.backend {
            BackendKind::Memory => {
                let sessions = match &config.dev_session {
                    Some((token, user)) => {
                        StaticSessions::new().with_user(token, UserIdentity::new(user))
                    }
                    None => StaticSessions::new(),
                };
                Ok(Self::memory(&config.local_store_root(), sessions, notifier))
            }
            BackendKind::Supabase => {
                let supabase = SupabaseConfig::from_env()?.with_bucket(config.bucket.clone());
                Ok(Self::supabase(supabase, config.store_root_url.as_deref(), notifier))
            }
        }
    }
}
