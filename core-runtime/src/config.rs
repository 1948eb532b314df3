//! # Core Configuration Module
//!
//! Builder-based configuration for the podcast core.
//!
//! ## Overview
//!
//! `CoreConfig` holds the host bridges and settings the core needs. The builder
//! validates eagerly so that a host missing a capability fails at startup with
//! an actionable message instead of at first use.
//!
//! ## Required Dependencies
//!
//! - `DocumentStore` - catalog reads
//! - `PlaybackDevice` - the native media engine
//!
//! ## Optional Dependencies
//!
//! - `LoggerSink` - mirror core logs into host logging
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .document_store(Arc::new(MyStore))
//!     .playback_device(Arc::new(MyDevice))
//!     .podcasts_collection("podcasts")
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{DocumentStore, LoggerSink, PlaybackDevice};
use std::sync::Arc;

/// Upper bound for the event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Remote document store holding the catalog (required)
    pub document_store: Arc<dyn DocumentStore>,

    /// Native playback engine (required)
    pub playback_device: Arc<dyn PlaybackDevice>,

    /// Host logger (optional)
    pub logger_sink: Option<Arc<dyn LoggerSink>>,

    /// Store collection names
    pub collections: CollectionNames,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("document_store", &"DocumentStore { ... }")
            .field("playback_device", &"PlaybackDevice { ... }")
            .field(
                "logger_sink",
                &self.logger_sink.as_ref().map(|_| "LoggerSink { ... }"),
            )
            .field("collections", &self.collections)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Names of the store collections the catalog reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub podcasts: String,
    pub events: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            podcasts: "podcasts".to_string(),
            events: "events".to_string(),
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Collection names are non-empty and distinct
    /// - Event buffer size is within `1..=10_000`
    pub fn validate(&self) -> Result<()> {
        if self.collections.podcasts.trim().is_empty() {
            return Err(Error::Config(
                "Podcasts collection name cannot be empty".to_string(),
            ));
        }

        if self.collections.events.trim().is_empty() {
            return Err(Error::Config(
                "Events collection name cannot be empty".to_string(),
            ));
        }

        if self.collections.podcasts == self.collections.events {
            return Err(Error::Config(format!(
                "Podcasts and events must live in different collections (both set to '{}')",
                self.collections.podcasts
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

fn document_store_missing_error() -> Error {
    Error::missing(
        "DocumentStore",
        "DocumentStore implementation is required to load podcasts and events. \
         Inject the platform's document database client via .document_store().",
    )
}

fn playback_device_missing_error() -> Error {
    Error::missing(
        "PlaybackDevice",
        "PlaybackDevice implementation is required for audio playback. \
         Mobile: wrap the native media engine (AVPlayer/ExoPlayer). \
         Inject it via .playback_device().",
    )
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    document_store: Option<Arc<dyn DocumentStore>>,
    playback_device: Option<Arc<dyn PlaybackDevice>>,
    logger_sink: Option<Arc<dyn LoggerSink>>,
    podcasts_collection: Option<String>,
    events_collection: Option<String>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the document store bridge.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    /// Sets the playback device bridge.
    pub fn playback_device(mut self, device: Arc<dyn PlaybackDevice>) -> Self {
        self.playback_device = Some(device);
        self
    }

    /// Sets the host logger sink.
    pub fn logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    /// Overrides the podcasts collection name (default `podcasts`).
    pub fn podcasts_collection(mut self, name: impl Into<String>) -> Self {
        self.podcasts_collection = Some(name.into());
        self
    }

    /// Overrides the events collection name (default `events`).
    pub fn events_collection(mut self, name: impl Into<String>) -> Self {
        self.events_collection = Some(name.into());
        self
    }

    /// Sets the event bus buffer size (default 100).
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - `CapabilityMissing` if the document store or playback device is absent
    /// - `Config` if a setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let document_store = self
            .document_store
            .ok_or_else(document_store_missing_error)?;
        let playback_device = self
            .playback_device
            .ok_or_else(playback_device_missing_error)?;

        let defaults = CollectionNames::default();
        let config = CoreConfig {
            document_store,
            playback_device,
            logger_sink: self.logger_sink,
            collections: CollectionNames {
                podcasts: self.podcasts_collection.unwrap_or(defaults.podcasts),
                events: self.events_collection.unwrap_or(defaults.events),
            },
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
