//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host application implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the podcast core and the platform.
//! Each trait is a capability the core needs but cannot provide itself:
//!
//! - [`PlaybackDevice`](playback::PlaybackDevice) - the native media engine
//!   (load, transport control, seek, status notifications)
//! - [`DocumentStore`](store::DocumentStore) - read access to the remote
//!   document database holding podcasts and events
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and keep messages actionable.
//!
//! ## Thread Safety
//!
//! Every bridge trait requires `Send + Sync` so that implementations can be
//! shared across async tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::store::{Document, DocumentStore};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct FixtureStore(Vec<Document>);
//!
//! #[async_trait]
//! impl DocumentStore for FixtureStore {
//!     async fn list_all(&self, _collection: &str) -> Result<Vec<Document>> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

pub mod error;
pub mod logging;
pub mod playback;
pub mod store;

pub use error::BridgeError;

pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{DeviceHandle, DeviceStatus, PlaybackDevice, StatusListener};
pub use store::{Document, DocumentStore};
