use casa_match::assistant::{
    provider_from_config, AssistantConversation, AssistantProvider, SharedConversation,
};
use casa_match::config::AppConfig;
use casa_match::error::AppError;
use casa_match::housing::listings::ListingStore;
use casa_match::housing::profile::{FileProfileStore, ProfileRoutes, ProfileSession, ProfileStore};
use casa_match::housing::search::MockListingService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Everything the HTTP routes share for the lifetime of the process.
pub(crate) struct CasaServices {
    pub(crate) listings: Arc<MockListingService>,
    pub(crate) profile: ProfileRoutes,
    pub(crate) conversation: SharedConversation,
}

impl CasaServices {
    pub(crate) fn new(
        store: ListingStore,
        profiles: Arc<dyn ProfileStore>,
        provider: Arc<dyn AssistantProvider>,
    ) -> Result<Self, AppError> {
        let listings = Arc::new(MockListingService::new(store));

        let mut session = ProfileSession::new(profiles);
        if session.restore()?.is_some() {
            info!("restored saved household profile");
        }

        Ok(Self {
            listings: listings.clone(),
            profile: ProfileRoutes {
                session: Arc::new(Mutex::new(session)),
                listings,
            },
            conversation: Arc::new(Mutex::new(AssistantConversation::new(provider))),
        })
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store = ListingStore::load(config.listings.dataset.as_deref())?;
        let profiles = Arc::new(FileProfileStore::new(&config.profile.directory));
        let provider = provider_from_config(&config.assistant)?;
        Self::new(store, profiles, provider)
    }
}
