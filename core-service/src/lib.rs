//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (document store,
//! playback device, logger) into the shared Rust core: one event bus, the
//! catalog, and a player host per screen that shows the player.
//!
//! ```ignore
//! use core_service::bootstrap;
//!
//! let core = bootstrap(config, SessionConfig::default(), LoggingConfig::default())?;
//! let shelf = core.catalog().newest(3).await?;
//! let mut host = core.player_host()?;
//! host.select(shelf[0].track()).await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use bridge_traits::PlaybackDevice;
use core_catalog::CatalogService;
use core_playback::{PlayerHost, SessionConfig, SessionController};
use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::{init_logging, LoggingConfig};
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    events: EventBus,
    catalog: CatalogService,
    device: Arc<dyn PlaybackDevice>,
    session: SessionConfig,
}

impl CoreService {
    /// Create a new service from validated configuration.
    ///
    /// # Errors
    ///
    /// `Runtime` if `config` is invalid, `Playback` if `session` is.
    pub fn new(config: CoreConfig, session: SessionConfig) -> Result<Self> {
        config.validate()?;
        session.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let catalog = CatalogService::new(
            config.document_store,
            config.collections,
            events.clone(),
        );

        Ok(Self {
            events,
            catalog,
            device: config.playback_device,
            session,
        })
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// New subscription to every core event.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    /// Start a playback session for a screen.
    ///
    /// Each host owns its own controller; the device still sees one live
    /// handle per host.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` when called outside a tokio runtime.
    pub fn player_host(&self) -> Result<PlayerHost> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CoreError::InitializationFailed(
                "player host requires a tokio runtime".to_string(),
            ));
        }

        let controller = SessionController::spawn(
            Arc::clone(&self.device),
            self.session.clone(),
            self.events.clone(),
        )?;
        Ok(PlayerHost::new(controller))
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("catalog", &self.catalog)
            .field("session", &self.session)
            .finish()
    }
}

/// Initialise logging and build the service.
///
/// The config's logger sink, if any, is attached to `logging` unless it
/// already carries one.
pub fn bootstrap(
    config: CoreConfig,
    session: SessionConfig,
    mut logging: LoggingConfig,
) -> Result<CoreService> {
    if logging.logger_sink.is_none() {
        logging.logger_sink = config.logger_sink.clone();
    }
    init_logging(logging)?;

    let service = CoreService::new(config, session)?;
    info!("Core service initialised");
    Ok(service)
}
