//! # Playback Session Module
//!
//! The in-app player's core: one active audio session against a host
//! [`PlaybackDevice`](bridge_traits::PlaybackDevice).
//!
//! ## Overview
//!
//! This module handles:
//! - Session lifecycle (acquire on show/track change, release on hide/close)
//! - Play/pause/seek commands and their clamping rules
//! - Merging device notifications with a fallback status poll
//! - Minimized/full presentation driven by drag gestures and a two-step close
//! - The host shim that turns screen props into `set_session` calls
//!
//! ## Example
//!
//! ```ignore
//! use core_playback::{SessionConfig, SessionController, Track};
//! use core_runtime::events::EventBus;
//!
//! let controller = SessionController::spawn(device, SessionConfig::default(), EventBus::default())?;
//! controller
//!     .set_session(Some(Track::new(audio_url, cover_url, "Episode 1")), true)
//!     .await?;
//! controller.toggle_play_pause().await?;
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod presentation;
pub mod session;
pub mod types;

pub use config::{GestureConfig, SessionConfig};
pub use error::{LoadError, PlaybackError, Result};
pub use host::PlayerHost;
pub use presentation::{CloseStep, PresentationController, PresentationMode, PresentationState};
pub use session::SessionController;
pub use types::{
    format_clock, CommandOutcome, IgnoreReason, PhaseEvent, PlaybackPhase, PlaybackState,
    SessionSnapshot, Track,
};
