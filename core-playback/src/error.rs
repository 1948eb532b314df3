//! # Playback Error Types
//!
//! Errors surfaced by the playback session controller.
//!
//! Most failures in this crate are deliberately *not* errors: commands that
//! race a teardown come back as [`CommandOutcome::Ignored`](crate::CommandOutcome)
//! and failed releases are only logged. What remains is the recoverable
//! [`LoadError`] plus a handful of controller-level failures.

use bridge_traits::BridgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A track could not be loaded into the device.
///
/// Always recoverable: the session returns to idle and the host may retry by
/// calling `set_session` again. Locators are stored redacted.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadError {
    /// The device rejected or failed the acquire.
    #[error("Device failed to load {locator}: {message}")]
    Device { locator: String, message: String },

    /// The acquire did not resolve within the configured timeout.
    #[error("Loading {locator} timed out after {after_ms} ms")]
    TimedOut { locator: String, after_ms: u64 },
}

impl LoadError {
    /// Redacted locator of the track that failed.
    pub fn locator(&self) -> &str {
        match self {
            LoadError::Device { locator, .. } | LoadError::TimedOut { locator, .. } => locator,
        }
    }

    /// Load failures never poison the controller.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

/// Errors returned by [`SessionController`](crate::SessionController) operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Loading the requested track failed.
    #[error("Track failed to load: {0}")]
    Load(#[from] LoadError),

    /// The controller's worker task is gone (shut down or runtime dropped).
    #[error("Session controller has stopped")]
    ControllerStopped,

    // ========================================================================
    // Platform/Adapter Errors
    // ========================================================================
    /// The device failed a transport command for a live handle.
    #[error("Playback device error: {0}")]
    Device(#[from] BridgeError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),
}

impl PlaybackError {
    /// Returns `true` if the operation may succeed when retried.
    pub fn is_transient(&self) -> bool {
        match self {
            PlaybackError::Load(err) => err.is_recoverable(),
            PlaybackError::Device(BridgeError::OperationFailed(_))
            | PlaybackError::Device(BridgeError::NotAvailable(_)) => true,
            _ => false,
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
