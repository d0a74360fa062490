use crate::components::events::{EventSync, EventsHandle, EventsSession, TicketmasterClient};
use crate::components::favorites::{FavoritesService, RedisFavoritesStore, UserSession};
use crate::components::geocoding::{GeocodingService, GoogleGeocoder};
use crate::components::map::MapSession;
use crate::components::redis_service::{RedisActor, RedisActorHandle};
use crate::components::travel::{DistanceMatrixClient, TravelEstimator};
use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::{other_error, PulseResult};
use crate::shutdown;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,localpulse=debug,reqwest=warn,redis=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// The long-lived services screens and jobs are built from
#[derive(Clone)]
pub struct Services {
    pub events: EventsHandle,
    pub geocoding: GeocodingService,
    pub travel: TravelEstimator,
    pub favorites: FavoritesService,
}

impl Services {
    /// Wire the production clients from configuration
    pub fn from_config(
        config: &Config,
        redis_handle: RedisActorHandle,
        session: UserSession,
    ) -> PulseResult<Self> {
        let source = Arc::new(TicketmasterClient::new(config)?);
        let geocoder = Arc::new(GoogleGeocoder::new(config)?);
        let routing = Arc::new(DistanceMatrixClient::new(config)?);
        let store = Arc::new(RedisFavoritesStore::new(redis_handle.clone()));

        Ok(Self {
            events: EventsHandle::new(source, redis_handle),
            geocoding: GeocodingService::new(geocoder, config.geocode_cache_capacity),
            travel: TravelEstimator::new(routing),
            favorites: FavoritesService::new(store, session),
        })
    }

    /// State for a new map screen
    pub fn map_session(&self) -> MapSession {
        MapSession::new(self.events.clone(), self.geocoding.clone(), self.travel.clone())
    }

    /// State for a new event list screen
    pub fn events_session(&self) -> EventsSession {
        EventsSession::new(self.events.clone(), self.favorites.clone())
    }
}

/// Start the background service and run until a shutdown signal
pub async fn start_service(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Initialize Redis service
    let (mut redis_actor, redis_handle) = RedisActor::new(Arc::clone(&config)).await?;

    // Spawn Redis actor task
    tokio::spawn(async move {
        redis_actor.run().await;
    });

    let services = {
        let config_read = config.read().await;
        Services::from_config(&config_read, redis_handle.clone(), UserSession::new())?
    };

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    let sync_enabled = config.read().await.is_component_enabled("event_sync");
    if sync_enabled {
        component_manager.register(EventSync::new(services.events.clone()));
    } else {
        info!("Event sync component disabled");
    }

    let component_manager = Arc::new(component_manager);
    component_manager.init_all(redis_handle.clone()).await?;

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Spawn signal handler task
    let shutdown_components = Arc::clone(&component_manager);
    let shutdown_redis = redis_handle.clone();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_redis).await;
    });

    info!("LocalPulse service running");

    shutdown_recv
        .await
        .map_err(|e| other_error(&format!("Shutdown channel closed: {}", e)))?;

    // The events actor is owned by the components when sync is on
    if !sync_enabled {
        services.events.shutdown().await?;
    }

    info!("Received shutdown signal, service stopped");
    Ok(())
}
