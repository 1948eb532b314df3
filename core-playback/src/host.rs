//! # Player Host Shim
//!
//! Adapts a screen's `{visible, selected track}` props to the controller.
//!
//! The host only forwards real changes to
//! [`SessionController::set_session`], the same way a component effect only
//! fires when its dependencies change. It also folds the controller's close
//! notification back into its own props: once the player has been closed
//! from the minimized bar, the selection is cleared and the player hidden.

use crate::error::Result;
use crate::presentation::CloseStep;
use crate::session::SessionController;
use crate::types::{PlaybackPhase, Track};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Owns the player props of one screen and the controller behind them.
///
/// Dropping the host drops the controller, which tears the session down.
#[derive(Debug)]
pub struct PlayerHost {
    controller: SessionController,
    visible: bool,
    selected: Option<Track>,
    closes_seen: u64,
}

impl PlayerHost {
    pub fn new(controller: SessionController) -> Self {
        let closes_seen = controller.snapshot().closed_count;
        Self {
            controller,
            visible: false,
            selected: None,
            closes_seen,
        }
    }

    /// Transport and gesture commands go straight to the controller.
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn selected(&self) -> Option<&Track> {
        self.selected.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// New props from the screen. Forwards to `set_session` only if
    /// something changed.
    pub async fn update(&mut self, visible: bool, track: Option<Track>) -> Result<()> {
        self.absorb_close();

        if self.visible == visible && self.selected == track {
            return Ok(());
        }

        self.visible = visible;
        self.selected = track.clone();
        self.controller.set_session(track, visible).await
    }

    /// Tap on a list item: close whatever is playing, then play `track`.
    pub async fn select(&mut self, track: Track) -> Result<()> {
        if self.selected.is_some() {
            self.dismiss().await?;
        }
        self.update(true, Some(track)).await
    }

    /// "Play" button: start the first track of the (filtered) list.
    pub async fn play_first(&mut self, tracks: &[Track]) -> Result<Option<Track>> {
        let Some(first) = tracks.first() else {
            return Ok(None);
        };
        self.update(true, Some(first.clone())).await?;
        Ok(Some(first.clone()))
    }

    /// "Shuffle" button: start a random track of the (filtered) list.
    pub async fn shuffle<R: Rng + ?Sized>(
        &mut self,
        tracks: &[Track],
        rng: &mut R,
    ) -> Result<Option<Track>> {
        let Some(pick) = tracks.choose(rng).cloned() else {
            return Ok(None);
        };
        self.update(true, Some(pick.clone())).await?;
        Ok(Some(pick))
    }

    /// Load the selected track again after a failure or after the device
    /// dropped it. Returns `false` when there is nothing to retry.
    pub async fn retry(&mut self) -> Result<bool> {
        self.absorb_close();

        let Some(track) = self.selected.clone() else {
            return Ok(false);
        };
        let snapshot = self.controller.snapshot();
        if !self.visible || snapshot.playback.phase != PlaybackPhase::Idle {
            return Ok(false);
        }

        debug!(had_error = snapshot.last_error.is_some(), "Retrying selected track");
        self.controller.set_session(Some(track), true).await?;
        Ok(true)
    }

    /// Hide the player and drop the selection.
    pub async fn dismiss(&mut self) -> Result<()> {
        self.update(false, None).await
    }

    /// Close button of the player. The second step clears the selection.
    pub async fn request_close(&mut self) -> Result<CloseStep> {
        let step = self.controller.request_close().await?;
        self.absorb_close();
        Ok(step)
    }

    /// Tear the session down and wait for the worker to stop.
    pub async fn unmount(self) -> Result<()> {
        self.controller.shutdown().await
    }

    /// Apply any close the controller has reported since the last call.
    fn absorb_close(&mut self) {
        let closed_count = self.controller.snapshot().closed_count;
        if closed_count == self.closes_seen {
            return;
        }
        self.closes_seen = closed_count;
        debug!(closed_count, "Player closed; clearing selection");
        self.visible = false;
        self.selected = None;
    }
}
