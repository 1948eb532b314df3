//! Playback device bridge.
//!
//! The core never talks to a platform media engine directly. Hosts provide a
//! [`PlaybackDevice`] that loads a single audio locator into a device-level
//! sound instance and hands back an opaque [`DeviceHandle`]. The contract below
//! is what the session controller relies on:
//!
//! - `acquire` may take arbitrarily long and resolves with a fresh handle.
//! - `play`/`pause` are idempotent; asking for the current transport state is a no-op.
//! - `seek` clamps positions outside `[0, duration]` instead of rejecting them.
//! - `release` is idempotent. Failures are reported, but callers are free to
//!   treat the handle as gone regardless.
//! - `subscribe` registers one listener per handle. A second call replaces the
//!   first. Snapshots are delivered at a cadence the device chooses, only
//!   while the handle is loaded.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque identifier for one loaded, device-level audio instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceHandle(Uuid);

impl DeviceHandle {
    /// Generate a new handle. Devices call this once per successful acquire.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a handle from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeviceHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time status of a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// `false` once the handle has been unloaded or failed.
    pub is_loaded: bool,
    /// Whether the transport is currently running.
    pub is_playing: bool,
    /// Current position in milliseconds.
    pub position_ms: u64,
    /// Total duration in milliseconds, when the engine knows it.
    pub duration_ms: Option<u64>,
}

impl DeviceStatus {
    /// Status reported for a handle that is no longer loaded.
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Convenience constructor for a loaded handle.
    pub fn loaded(is_playing: bool, position_ms: u64, duration_ms: Option<u64>) -> Self {
        Self {
            is_loaded: true,
            is_playing,
            position_ms,
            duration_ms,
        }
    }
}

/// Callback invoked by the device whenever it publishes a status snapshot.
///
/// Listeners must be cheap and non-blocking; they are called from whatever
/// context the device engine reports from.
pub type StatusListener = Arc<dyn Fn(DeviceStatus) + Send + Sync>;

/// Platform media engine capability.
#[async_trait::async_trait]
pub trait PlaybackDevice: Send + Sync {
    /// Load `uri` into a new sound instance. When `autoplay` is set the
    /// transport starts as soon as the instance is ready.
    async fn acquire(&self, uri: &str, autoplay: bool) -> Result<DeviceHandle>;

    /// Start or resume the transport.
    async fn play(&self, handle: DeviceHandle) -> Result<()>;

    /// Pause the transport without unloading.
    async fn pause(&self, handle: DeviceHandle) -> Result<()>;

    /// Move the play head to `position_ms`, clamped by the device.
    async fn seek(&self, handle: DeviceHandle, position_ms: u64) -> Result<()>;

    /// Unload the instance and free its native resources.
    async fn release(&self, handle: DeviceHandle) -> Result<()>;

    /// Read the current status of `handle`.
    async fn status(&self, handle: DeviceHandle) -> Result<DeviceStatus>;

    /// Register the status listener for `handle`.
    async fn subscribe(&self, handle: DeviceHandle, listener: StatusListener) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_handles_are_unique() {
        let a = DeviceHandle::new();
        let b = DeviceHandle::new();
        assert_ne!(a, b);
        assert_eq!(a, DeviceHandle::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn unloaded_status_is_all_zero() {
        let status = DeviceStatus::unloaded();
        assert!(!status.is_loaded);
        assert!(!status.is_playing);
        assert_eq!(status.position_ms, 0);
        assert_eq!(status.duration_ms, None);
    }

    #[test]
    fn status_serializes_with_optional_duration() {
        let status = DeviceStatus::loaded(true, 1_500, None);
        let json = serde_json::to_string(&status).unwrap();
        let back: DeviceStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
