//! # Session Types
//!
//! Value types shared between the controller, the host shim and callers.

use crate::error::LoadError;
use crate::presentation::PresentationState;
use serde::{Deserialize, Serialize};

// ============================================================================
// Track
// ============================================================================

/// The audio item a host asks the controller to play.
///
/// Immutable for the life of a session. Identity is structural: two tracks are
/// the same track when every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Locator handed to the device's `acquire`.
    pub audio_locator: String,
    /// Artwork locator, only rendered by the host.
    pub cover_locator: String,
    pub title: String,
    /// Catalog id, when the track came from the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Track {
    pub fn new(
        audio_locator: impl Into<String>,
        cover_locator: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            audio_locator: audio_locator.into(),
            cover_locator: cover_locator.into(),
            title: title.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// ============================================================================
// Phase Transition Table
// ============================================================================

/// Lifecycle phase of the playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No handle and nothing being loaded.
    #[default]
    Idle,
    /// An acquire is in flight.
    Loading,
    Playing,
    Paused,
}

/// Inputs that drive [`PlaybackPhase::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// An acquire was issued.
    Acquire,
    /// The acquired handle was installed; `playing` is the transport state
    /// the device reported.
    Installed { playing: bool },
    /// The acquire failed or timed out.
    LoadFailed,
    /// A `play` command succeeded.
    Play,
    /// A `pause` command succeeded.
    Pause,
    /// A fresh status sample from the device.
    Sample { playing: bool },
    /// The handle was released (or never existed).
    Release,
}

impl PlaybackPhase {
    /// Explicit transition table.
    ///
    /// Returns `None` when `event` is not valid from `self`; callers treat
    /// such inputs as inert. Note that `Acquire` is only accepted from
    /// `Idle`/`Loading`: a live handle must be released first.
    pub fn next(self, event: PhaseEvent) -> Option<PlaybackPhase> {
        use PhaseEvent as E;
        use PlaybackPhase as P;

        match (self, event) {
            (_, E::Release) => Some(P::Idle),
            (P::Idle | P::Loading, E::Acquire) => Some(P::Loading),
            (P::Loading, E::Installed { playing }) => Some(Self::transport(playing)),
            (P::Loading, E::LoadFailed) => Some(P::Idle),
            (P::Playing, E::Pause) => Some(P::Paused),
            (P::Paused, E::Play) => Some(P::Playing),
            (P::Playing | P::Paused, E::Sample { playing }) => Some(Self::transport(playing)),
            _ => None,
        }
    }

    fn transport(playing: bool) -> PlaybackPhase {
        if playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }

    /// `true` when a device handle is installed.
    pub fn has_handle(&self) -> bool {
        matches!(self, PlaybackPhase::Playing | PlaybackPhase::Paused)
    }
}

// ============================================================================
// Playback State
// ============================================================================

/// Derived playback state.
///
/// `duration_ms == 0` means the duration is not known yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub position_ms: u64,
    pub duration_ms: u64,
}

impl PlaybackState {
    /// State with the position clamped into `[0, duration]`.
    ///
    /// Late notifications can briefly report a position past the end.
    pub fn clamped(&self) -> Self {
        let mut state = *self;
        if state.duration_ms > 0 {
            state.position_ms = state.position_ms.min(state.duration_ms);
        }
        state
    }

    /// Clamp a requested seek target. Unknown duration clamps only the lower bound.
    pub fn clamp_target(&self, target_ms: i64) -> u64 {
        let lower = target_ms.max(0) as u64;
        if self.duration_ms > 0 {
            lower.min(self.duration_ms)
        } else {
            lower
        }
    }

    /// Position formatted as `m:ss`.
    pub fn position_label(&self) -> String {
        format_clock(self.clamped().position_ms)
    }

    /// Duration formatted as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_clock(self.duration_ms)
    }
}

/// Format milliseconds as `m:ss` for the player's time labels.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

// ============================================================================
// Snapshot & Command Outcome
// ============================================================================

/// Consistent view of everything the controller owns.
///
/// Published as a whole on every change; readers never see a half-updated shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Playback state, position already clamped.
    pub playback: PlaybackState,
    pub presentation: PresentationState,
    /// Desired track, if any.
    pub track: Option<Track>,
    /// Most recent load failure, cleared by the next acquire.
    pub last_error: Option<LoadError>,
    /// Number of completed two-step closes.
    pub closed_count: u64,
}

/// Why a command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// No handle is installed, or the device reported it gone.
    NoActiveHandle,
    /// The command is not valid from the current phase.
    InvalidPhase(PlaybackPhase),
}

/// Result of a transport command. `Ignored` is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}
