//! # Presentation Mode State
//!
//! Minimized bar vs. full player, driven by a vertical drag gesture and by
//! explicit close/toggle intents.
//!
//! ## Gesture model
//!
//! Direct manipulation, not velocity integration:
//! - A gesture engages once its first sample moves more than `activation_px`.
//! - While engaged, each sample sets `drag_offset_px` to the sample's `dy`.
//! - On release, `dy > release_px` minimizes, `dy < -release_px` restores
//!   the full player, anything in between leaves the mode alone. The drag
//!   offset is reset to zero on every release.
//!
//! ## Close policy
//!
//! Closing is two-step. From the full player a close only minimizes; from the
//! minimized bar it tears the session down.

use crate::config::GestureConfig;
use serde::{Deserialize, Serialize};

/// Which player layout the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PresentationMode {
    Minimized,
    #[default]
    Full,
}

/// Render state for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresentationState {
    pub mode: PresentationMode,
    /// Vertical translation of the full player during a drag.
    pub drag_offset_px: i32,
}

/// What a `request_close` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseStep {
    /// Full player collapsed to the minimized bar. Playback continues.
    Minimized,
    /// The session was released and the host notified.
    Teardown,
}

/// Owns [`PresentationState`] and the gesture engagement flag.
#[derive(Debug, Clone)]
pub struct PresentationController {
    state: PresentationState,
    engaged: bool,
    gesture: GestureConfig,
}

impl PresentationController {
    pub fn new(gesture: GestureConfig) -> Self {
        Self {
            state: PresentationState::default(),
            engaged: false,
            gesture,
        }
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    pub fn mode(&self) -> PresentationMode {
        self.state.mode
    }

    /// Feed one gesture sample. Returns `true` if the drag offset changed.
    pub fn on_gesture_move(&mut self, dy: i32) -> bool {
        if !self.engaged {
            if dy.saturating_abs() <= self.gesture.activation_px {
                return false;
            }
            self.engaged = true;
        }

        let changed = self.state.drag_offset_px != dy;
        self.state.drag_offset_px = dy;
        changed
    }

    /// End the gesture. Returns the new mode if it changed.
    pub fn on_gesture_release(&mut self, dy: i32) -> Option<PresentationMode> {
        self.engaged = false;
        self.state.drag_offset_px = 0;

        let target = if dy > self.gesture.release_px {
            PresentationMode::Minimized
        } else if dy < -self.gesture.release_px {
            PresentationMode::Full
        } else {
            return None;
        };

        self.set_mode(target)
    }

    /// First step of the close policy. The caller performs the teardown when
    /// this returns [`CloseStep::Teardown`].
    pub fn request_close(&mut self) -> CloseStep {
        match self.state.mode {
            PresentationMode::Full => {
                self.state.mode = PresentationMode::Minimized;
                CloseStep::Minimized
            }
            PresentationMode::Minimized => CloseStep::Teardown,
        }
    }

    /// Programmatic switch, e.g. tapping the minimized bar.
    pub fn toggle(&mut self) -> PresentationMode {
        let target = match self.state.mode {
            PresentationMode::Minimized => PresentationMode::Full,
            PresentationMode::Full => PresentationMode::Minimized,
        };
        self.state.mode = target;
        target
    }

    /// Back to a fresh full player with no gesture in progress.
    pub fn reset(&mut self) {
        self.state = PresentationState::default();
        self.engaged = false;
    }

    fn set_mode(&mut self, mode: PresentationMode) -> Option<PresentationMode> {
        if self.state.mode == mode {
            return None;
        }
        self.state.mode = mode;
        Some(mode)
    }
}

impl Default for PresentationController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
