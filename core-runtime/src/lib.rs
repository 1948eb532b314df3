//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the podcast core crates:
//! - Logging and tracing setup, with forwarding to a host [`LoggerSink`](bridge_traits::LoggerSink)
//! - Configuration (`CoreConfig` builder with fail-fast bridge validation)
//! - Event bus for playback, presentation and catalog notifications
//!
//! ## Overview
//!
//! Nothing in here knows about audio or documents beyond the bridge traits.
//! Domain crates (`core-playback`, `core-catalog`) publish onto the
//! [`EventBus`](events::EventBus) and log through `tracing`; the host picks
//! the output format once at startup.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
