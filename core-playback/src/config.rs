//! # Session Configuration
//!
//! Tunables for the playback session controller and the player's gesture
//! handling.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback session controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval of the defensive status poll.
    ///
    /// Covers devices whose notifications stall while paused or backgrounded.
    ///
    /// Default: 1 second.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,

    /// How long an acquire may stay pending before the load is failed with
    /// `LoadError::TimedOut`.
    ///
    /// Default: 15 seconds.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout: Duration,

    /// Start the transport as soon as a track is loaded.
    ///
    /// Default: true.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Queue depth above which the worker logs a backlog warning.
    ///
    /// Default: 64 messages.
    #[serde(default = "default_command_queue_warn_depth")]
    pub command_queue_warn_depth: usize,

    /// Drag gesture thresholds.
    #[serde(default)]
    pub gesture: GestureConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            acquire_timeout: default_acquire_timeout(),
            autoplay: default_autoplay(),
            command_queue_warn_depth: default_command_queue_warn_depth(),
            gesture: GestureConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load tracks paused; the user starts playback explicitly.
    pub fn manual_start() -> Self {
        Self {
            autoplay: false,
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "poll_interval must be > 0".to_string(),
            ));
        }

        if self.acquire_timeout.is_zero() {
            return Err(PlaybackError::InvalidConfig(
                "acquire_timeout must be > 0".to_string(),
            ));
        }

        if self.command_queue_warn_depth == 0 {
            return Err(PlaybackError::InvalidConfig(
                "command_queue_warn_depth must be > 0".to_string(),
            ));
        }

        self.gesture.validate()
    }
}

/// Drag gesture thresholds, in pixels of vertical travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// A gesture engages only once its first sample moves further than this.
    ///
    /// Default: 20px.
    #[serde(default = "default_activation_px")]
    pub activation_px: i32,

    /// Releasing beyond this distance switches the presentation mode.
    ///
    /// Default: 100px.
    #[serde(default = "default_release_px")]
    pub release_px: i32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            activation_px: default_activation_px(),
            release_px: default_release_px(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.activation_px < 0 {
            return Err(PlaybackError::InvalidConfig(
                "activation_px cannot be negative".to_string(),
            ));
        }

        if self.release_px <= self.activation_px {
            return Err(PlaybackError::InvalidConfig(
                "release_px must exceed activation_px".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_poll_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_acquire_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_autoplay() -> bool {
    true
}

fn default_command_queue_warn_depth() -> usize {
    64
}

fn default_activation_px() -> i32 {
    20
}

fn default_release_px() -> i32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_behaviour() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.acquire_timeout, Duration::from_secs(15));
        assert!(config.autoplay);
        assert_eq!(config.gesture.activation_px, 20);
        assert_eq!(config.gesture.release_px, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn manual_start_preset() {
        let config = SessionConfig::manual_start();
        assert!(!config.autoplay);
        assert_eq!(config.poll_interval, default_poll_interval());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "autoplay": false }"#).unwrap();
        assert!(!config.autoplay);
        assert_eq!(config.acquire_timeout, Duration::from_secs(15));
        assert_eq!(config.gesture, GestureConfig::default());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_poll = SessionConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            zero_poll.validate(),
            Err(PlaybackError::InvalidConfig(msg)) if msg.contains("poll_interval")
        ));

        let zero_timeout = SessionConfig {
            acquire_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());

        let inverted = SessionConfig {
            gesture: GestureConfig {
                activation_px: 120,
                release_px: 100,
            },
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
