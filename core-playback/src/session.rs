//! # Playback Session Controller
//!
//! Owns the single device handle of the in-app player and derives
//! [`PlaybackState`] from commands, device notifications and a fallback poll.
//!
//! ## Architecture
//!
//! The controller is a handle to one worker task. Everything that can change
//! state is a message on one ordered queue, consumed by that task:
//!
//! ```text
//!  SessionController ──commands──┐
//!  status listener  ──samples────┤
//!  acquire task     ──resolved───┼──> mpsc queue ──> worker ──> watch<SessionSnapshot>
//!  deadline task    ──timeout────┘                     │
//!  poll interval    ──────────────────────────────────┘
//! ```
//!
//! The only suspension points inside the worker are device calls, and the
//! worker never runs two of them at once.
//!
//! ## Stale resolutions
//!
//! Every acquire carries a generation. When the desired track changes, the
//! pending generation is abandoned without waiting for it; if it resolves
//! later its handle is released immediately and never installed. Acquire
//! timeouts work the same way: the deadline abandons the generation, so a
//! late handle is released rather than leaked.
//!
//! ## Sample ordering
//!
//! Each status sample is stamped from a monotonic counter when it is produced
//! (listener invocation or poll request). Completed commands take a stamp too.
//! A sample is applied only if its stamp is newer than the last applied
//! write, so a notification produced before a pause completed cannot flip
//! the state back to playing.

use crate::config::SessionConfig;
use crate::error::{LoadError, PlaybackError, Result};
use crate::presentation::{CloseStep, PresentationController, PresentationMode};
use crate::types::{
    CommandOutcome, IgnoreReason, PhaseEvent, PlaybackPhase, PlaybackState, SessionSnapshot,
    Track,
};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, DeviceHandle, DeviceStatus, PlaybackDevice, StatusListener};
use core_runtime::events::{
    CoreEvent, EventBus, PlaybackEvent, PresentationEvent, PresentationKind,
};
use core_runtime::logging::redact_locator;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Messages
// ============================================================================

type Reply<T> = oneshot::Sender<T>;

enum Command {
    SetSession {
        track: Option<Track>,
        visible: bool,
        reply: Reply<()>,
    },
    TogglePlayPause {
        reply: Reply<Result<CommandOutcome>>,
    },
    SeekAbsolute {
        target_ms: i64,
        reply: Reply<Result<CommandOutcome>>,
    },
    SeekRelative {
        delta_ms: i64,
        reply: Reply<Result<CommandOutcome>>,
    },
    GestureMove {
        dy: i32,
        reply: Reply<()>,
    },
    GestureRelease {
        dy: i32,
        reply: Reply<PresentationMode>,
    },
    RequestClose {
        reply: Reply<CloseStep>,
    },
    TogglePresentation {
        reply: Reply<PresentationMode>,
    },
    Refresh {
        reply: Reply<()>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}

enum Message {
    Command(Command),
    AcquireResolved {
        generation: u64,
        uri: String,
        result: BridgeResult<DeviceHandle>,
    },
    AcquireDeadline {
        generation: u64,
    },
    Status {
        handle: DeviceHandle,
        stamp: u64,
        status: DeviceStatus,
    },
}

/// Monotonic stamp source shared with status listeners.
#[derive(Clone, Default)]
struct StampClock(Arc<AtomicU64>);

impl StampClock {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// ============================================================================
// Public Handle
// ============================================================================

/// Handle to a running playback session.
///
/// Dropping the controller closes its queue; the worker then releases any
/// owned handle and exits. Use [`shutdown`](Self::shutdown) to wait for that.
pub struct SessionController {
    tx: mpsc::UnboundedSender<Message>,
    snapshot: watch::Receiver<SessionSnapshot>,
    worker: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    /// Spawn the worker task on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `config` fails validation.
    pub fn spawn(
        device: Arc<dyn PlaybackDevice>,
        config: SessionConfig,
        events: EventBus,
    ) -> Result<Self> {
        config.validate()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(SessionSnapshot::default());

        let worker = Worker {
            presentation: PresentationController::new(config.gesture),
            device,
            config,
            events,
            tx: tx.downgrade(),
            clock: StampClock::default(),
            snapshot_tx,
            playback: PlaybackState::default(),
            track: None,
            active: None,
            pending: None,
            generation: 0,
            last_applied: 0,
            last_error: None,
            closed_count: 0,
            backlogged: false,
        };
        let handle = tokio::spawn(worker.run(rx));

        Ok(Self {
            tx,
            snapshot,
            worker: parking_lot::Mutex::new(Some(handle)),
        })
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Message::Command(build(reply)))
            .map_err(|_| PlaybackError::ControllerStopped)?;
        response.await.map_err(|_| PlaybackError::ControllerStopped)
    }

    /// Host lifecycle entry point.
    ///
    /// Invisible: release the handle and reset to idle. Visible with a new
    /// track: release the current handle (awaited), then issue the acquire.
    /// Returns once the release is done and the acquire issued; it does not
    /// wait for the load. Calls are applied strictly in order.
    pub async fn set_session(&self, track: Option<Track>, visible: bool) -> Result<()> {
        self.request(|reply| Command::SetSession {
            track,
            visible,
            reply,
        })
        .await
    }

    /// Playing → Paused, Paused → Playing. Ignored while idle or loading.
    pub async fn toggle_play_pause(&self) -> Result<CommandOutcome> {
        self.request(|reply| Command::TogglePlayPause { reply })
            .await?
    }

    /// Seek to `target_ms`, clamped to `[0, duration]`.
    pub async fn seek_absolute(&self, target_ms: i64) -> Result<CommandOutcome> {
        self.request(|reply| Command::SeekAbsolute { target_ms, reply })
            .await?
    }

    /// Seek by `delta_ms` from the current position. With an unknown
    /// duration only the lower bound is clamped.
    pub async fn seek_relative(&self, delta_ms: i64) -> Result<CommandOutcome> {
        self.request(|reply| Command::SeekRelative { delta_ms, reply })
            .await?
    }

    /// Feed a drag sample (vertical travel since the gesture started).
    pub async fn on_gesture_move(&self, dy: i32) -> Result<()> {
        self.request(|reply| Command::GestureMove { dy, reply }).await
    }

    /// End the drag gesture; returns the resulting mode.
    pub async fn on_gesture_release(&self, dy: i32) -> Result<PresentationMode> {
        self.request(|reply| Command::GestureRelease { dy, reply })
            .await
    }

    /// Two-step close: minimize first, tear down from the minimized bar.
    pub async fn request_close(&self) -> Result<CloseStep> {
        self.request(|reply| Command::RequestClose { reply }).await
    }

    /// Switch between minimized and full.
    pub async fn toggle_presentation(&self) -> Result<PresentationMode> {
        self.request(|reply| Command::TogglePresentation { reply })
            .await
    }

    /// Re-read device status now instead of waiting for the next poll tick.
    ///
    /// Also acts as a barrier: every message queued before this call has
    /// been processed when it returns.
    pub async fn refresh(&self) -> Result<()> {
        self.request(|reply| Command::Refresh { reply }).await
    }

    /// Release the session and stop the worker.
    pub async fn shutdown(&self) -> Result<()> {
        let result = self.request(|reply| Command::Shutdown { reply }).await;
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
        result
    }

    /// Current playback state, position clamped.
    pub fn state(&self) -> PlaybackState {
        self.snapshot.borrow().playback
    }

    /// Full consistent snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Change notifications; every published value is a complete snapshot.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("snapshot", &*self.snapshot.borrow())
            .finish()
    }
}

// ============================================================================
// Worker
// ============================================================================

struct PendingLoad {
    generation: u64,
    track: Track,
    deadline: JoinHandle<()>,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.deadline.abort();
    }
}

struct Worker {
    device: Arc<dyn PlaybackDevice>,
    config: SessionConfig,
    events: EventBus,
    tx: mpsc::WeakUnboundedSender<Message>,
    clock: StampClock,
    snapshot_tx: watch::Sender<SessionSnapshot>,

    playback: PlaybackState,
    presentation: PresentationController,
    track: Option<Track>,
    active: Option<DeviceHandle>,
    pending: Option<PendingLoad>,
    generation: u64,
    last_applied: u64,
    last_error: Option<LoadError>,
    closed_count: u64,
    backlogged: bool,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Message>) {
        let period = self.config.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(poll_ms = period.as_millis() as u64, "Session worker started");

        loop {
            tokio::select! {
                message = rx.recv() => {
                    let Some(message) = message else {
                        self.release_session().await;
                        self.publish();
                        break;
                    };

                    let backlog = rx.len();
                    if backlog >= self.config.command_queue_warn_depth {
                        if !self.backlogged {
                            self.backlogged = true;
                            warn!(backlog, "Session queue is backing up");
                        }
                    } else if self.backlogged {
                        self.backlogged = false;
                        debug!(backlog, "Session queue drained");
                    }

                    if let Message::Command(Command::Shutdown { reply }) = message {
                        self.release_session().await;
                        self.publish();
                        let _ = reply.send(());
                        break;
                    }

                    self.handle(message).await;
                }
                _ = ticker.tick() => self.poll().await,
            }
        }

        debug!("Session worker stopped");
    }

    async fn handle(&mut self, message: Message) {
        match message {
            Message::Command(command) => self.handle_command(command).await,
            Message::AcquireResolved {
                generation,
                uri,
                result,
            } => self.on_acquire_resolved(generation, &uri, result).await,
            Message::AcquireDeadline { generation } => self.on_deadline(generation),
            Message::Status {
                handle,
                stamp,
                status,
            } => self.apply_sample(handle, stamp, status),
        }
        self.publish();
    }

    /// Every arm publishes before replying, so a caller that reads
    /// [`SessionController::state`] after a command returns sees its effect.
    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetSession {
                track,
                visible,
                reply,
            } => {
                self.set_session(track, visible).await;
                self.publish();
                let _ = reply.send(());
            }
            Command::TogglePlayPause { reply } => {
                let outcome = self.toggle_play_pause().await;
                self.publish();
                let _ = reply.send(outcome);
            }
            Command::SeekAbsolute { target_ms, reply } => {
                let outcome = self.seek(target_ms).await;
                self.publish();
                let _ = reply.send(outcome);
            }
            Command::SeekRelative { delta_ms, reply } => {
                let base = self.playback.clamped().position_ms as i64;
                let outcome = self.seek(base.saturating_add(delta_ms)).await;
                self.publish();
                let _ = reply.send(outcome);
            }
            Command::GestureMove { dy, reply } => {
                self.presentation.on_gesture_move(dy);
                self.publish();
                let _ = reply.send(());
            }
            Command::GestureRelease { dy, reply } => {
                if let Some(mode) = self.presentation.on_gesture_release(dy) {
                    self.emit_mode(mode);
                }
                self.publish();
                let _ = reply.send(self.presentation.mode());
            }
            Command::RequestClose { reply } => {
                let step = self.request_close().await;
                self.publish();
                let _ = reply.send(step);
            }
            Command::TogglePresentation { reply } => {
                let mode = self.presentation.toggle();
                self.emit_mode(mode);
                self.publish();
                let _ = reply.send(mode);
            }
            Command::Refresh { reply } => {
                self.poll().await;
                let _ = reply.send(());
            }
            // Handled by the run loop.
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    #[instrument(skip_all, fields(visible = visible, has_track = track.is_some()))]
    async fn set_session(&mut self, track: Option<Track>, visible: bool) {
        if !visible {
            self.presentation.reset();
        }
        let desired = if visible { track } else { None };

        // Same track still loading or loaded: nothing to do. An idle session
        // with the same track is a retry after a failed load.
        if desired == self.track && self.playback.phase != PlaybackPhase::Idle {
            return;
        }

        self.release_session().await;
        self.track = desired.clone();

        if let Some(track) = desired {
            self.begin_load(track);
        }
    }

    /// Release the installed handle (awaited), abandon any pending acquire
    /// and reset playback to idle.
    async fn release_session(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(generation = pending.generation, "Abandoning pending load");
        }

        if let Some(handle) = self.active.take() {
            self.release_handle(handle).await;
            let locator = self
                .track
                .as_ref()
                .map(|t| redact_locator(&t.audio_locator))
                .unwrap_or_default();
            info!(%handle, "Playback session released");
            self.emit(CoreEvent::Playback(PlaybackEvent::Released { locator }));
        }

        self.transition(PhaseEvent::Release);
        self.playback.position_ms = 0;
        self.playback.duration_ms = 0;
        self.last_applied = self.clock.next();
    }

    /// Release failures are logged and otherwise ignored; the handle is
    /// considered gone either way.
    async fn release_handle(&self, handle: DeviceHandle) {
        if let Err(err) = self.device.release(handle).await {
            warn!(%handle, error = %err, "Device release failed; treating handle as released");
        }
    }

    fn begin_load(&mut self, track: Track) {
        self.generation += 1;
        let generation = self.generation;
        let locator = redact_locator(&track.audio_locator);

        self.transition(PhaseEvent::Acquire);
        self.last_error = None;

        let device = Arc::clone(&self.device);
        let tx = self.tx.clone();
        let uri = track.audio_locator.clone();
        let autoplay = self.config.autoplay;
        tokio::spawn(async move {
            let result = device.acquire(&uri, autoplay).await;
            let message = Message::AcquireResolved {
                generation,
                uri,
                result,
            };
            let unsent = match tx.upgrade() {
                Some(tx) => tx
                    .send(message)
                    .err()
                    .map(|mpsc::error::SendError(message)| message),
                None => Some(message),
            };
            // Controller is gone; nobody else will release this handle.
            if let Some(Message::AcquireResolved {
                result: Ok(handle), ..
            }) = unsent
            {
                let _ = device.release(handle).await;
            }
        });

        let tx = self.tx.clone();
        let timeout = self.config.acquire_timeout;
        let deadline = tokio::spawn(async move {
            time::sleep(timeout).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Message::AcquireDeadline { generation });
            }
        });

        self.pending = Some(PendingLoad {
            generation,
            track,
            deadline,
        });

        info!(%locator, generation, "Loading track");
        self.emit(CoreEvent::Playback(PlaybackEvent::Loading { locator }));
    }

    fn take_pending(&mut self, generation: u64) -> Option<PendingLoad> {
        match self.pending.take() {
            Some(pending) if pending.generation == generation => Some(pending),
            other => {
                self.pending = other;
                None
            }
        }
    }

    async fn on_acquire_resolved(
        &mut self,
        generation: u64,
        uri: &str,
        result: BridgeResult<DeviceHandle>,
    ) {
        let Some(pending) = self.take_pending(generation) else {
            match result {
                Ok(handle) => {
                    let locator = redact_locator(uri);
                    warn!(%handle, %locator, generation, "Discarding stale load");
                    self.release_handle(handle).await;
                    self.emit(CoreEvent::Playback(PlaybackEvent::StaleLoadDiscarded {
                        locator,
                    }));
                }
                Err(err) => debug!(generation, error = %err, "Stale load failed"),
            }
            return;
        };

        let locator = redact_locator(&pending.track.audio_locator);
        match result {
            Ok(handle) => self.install(handle, locator).await,
            Err(err) => self.fail_load(LoadError::Device {
                locator,
                message: err.to_string(),
            }),
        }
    }

    fn on_deadline(&mut self, generation: u64) {
        let Some(pending) = self.take_pending(generation) else {
            return;
        };

        let after_ms = self.config.acquire_timeout.as_millis() as u64;
        self.fail_load(LoadError::TimedOut {
            locator: redact_locator(&pending.track.audio_locator),
            after_ms,
        });
    }

    async fn install(&mut self, handle: DeviceHandle, locator: String) {
        self.active = Some(handle);

        let tx = self.tx.clone();
        let clock = self.clock.clone();
        let listener: StatusListener = Arc::new(move |status| {
            let stamp = clock.next();
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Message::Status {
                    handle,
                    stamp,
                    status,
                });
            }
        });
        if let Err(err) = self.device.subscribe(handle, listener).await {
            warn!(%handle, error = %err, "Status subscription failed; relying on poll");
        }

        let status = match self.device.status(handle).await {
            Ok(status) => Some(status),
            Err(err) => {
                debug!(%handle, error = %err, "Initial status unavailable");
                None
            }
        };

        let playing = status.map_or(self.config.autoplay, |s| s.is_playing);
        self.transition(PhaseEvent::Installed { playing });
        if let Some(status) = status {
            self.playback.position_ms = status.position_ms;
            self.playback.duration_ms = status.duration_ms.unwrap_or(0);
        }
        self.last_applied = self.clock.next();

        info!(%handle, %locator, playing, "Track loaded");
        self.emit(CoreEvent::Playback(PlaybackEvent::Loaded {
            locator,
            autoplay: playing,
        }));
    }

    fn fail_load(&mut self, error: LoadError) {
        warn!(error = %error, "Track failed to load");
        self.transition(PhaseEvent::LoadFailed);
        self.playback.position_ms = 0;
        self.playback.duration_ms = 0;
        self.emit(CoreEvent::Playback(PlaybackEvent::LoadFailed {
            locator: error.locator().to_string(),
            message: error.to_string(),
            recoverable: error.is_recoverable(),
        }));
        self.last_error = Some(error);
    }

    async fn request_close(&mut self) -> CloseStep {
        let step = self.presentation.request_close();
        match step {
            CloseStep::Minimized => self.emit_mode(PresentationMode::Minimized),
            CloseStep::Teardown => {
                self.release_session().await;
                self.track = None;
                self.presentation.reset();
                self.closed_count += 1;
                info!(closed_count = self.closed_count, "Player closed");
                self.emit(CoreEvent::Presentation(PresentationEvent::Closed));
            }
        }
        step
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    async fn toggle_play_pause(&mut self) -> Result<CommandOutcome> {
        let (event, pausing) = match self.playback.phase {
            PlaybackPhase::Playing => (PhaseEvent::Pause, true),
            PlaybackPhase::Paused => (PhaseEvent::Play, false),
            phase => return Ok(CommandOutcome::Ignored(IgnoreReason::InvalidPhase(phase))),
        };
        let Some(handle) = self.active else {
            return Ok(CommandOutcome::Ignored(IgnoreReason::NoActiveHandle));
        };

        let result = if pausing {
            self.device.pause(handle).await
        } else {
            self.device.play(handle).await
        };
        if let Some(outcome) = Self::absorb(result)? {
            return Ok(outcome);
        }

        self.transition(event);
        self.last_applied = self.clock.next();

        let position_ms = self.playback.clamped().position_ms;
        self.emit(CoreEvent::Playback(if pausing {
            PlaybackEvent::Paused { position_ms }
        } else {
            PlaybackEvent::Resumed { position_ms }
        }));
        Ok(CommandOutcome::Applied)
    }

    async fn seek(&mut self, target_ms: i64) -> Result<CommandOutcome> {
        if !self.playback.phase.has_handle() {
            return Ok(CommandOutcome::Ignored(IgnoreReason::InvalidPhase(
                self.playback.phase,
            )));
        }
        let Some(handle) = self.active else {
            return Ok(CommandOutcome::Ignored(IgnoreReason::NoActiveHandle));
        };

        let position_ms = self.playback.clamp_target(target_ms);
        if let Some(outcome) = Self::absorb(self.device.seek(handle, position_ms).await)? {
            return Ok(outcome);
        }

        self.playback.position_ms = position_ms;
        self.last_applied = self.clock.next();

        debug!(position_ms, "Seeked");
        self.emit(CoreEvent::Playback(PlaybackEvent::Seeked {
            position_ms,
            duration_ms: self.playback.duration_ms,
        }));
        Ok(CommandOutcome::Applied)
    }

    /// A device that no longer knows the handle turns a command into an
    /// ignored one. Other device failures are returned to the caller.
    fn absorb(result: BridgeResult<()>) -> Result<Option<CommandOutcome>> {
        match result {
            Ok(()) => Ok(None),
            Err(err) if err.is_invalid_handle() => {
                debug!(error = %err, "Command raced a release");
                Ok(Some(CommandOutcome::Ignored(IgnoreReason::NoActiveHandle)))
            }
            Err(err) => Err(PlaybackError::Device(err)),
        }
    }

    // ------------------------------------------------------------------------
    // Status samples
    // ------------------------------------------------------------------------

    async fn poll(&mut self) {
        let Some(handle) = self.active else {
            return;
        };
        let stamp = self.clock.next();

        match self.device.status(handle).await {
            Ok(status) => self.apply_sample(handle, stamp, status),
            Err(BridgeError::InvalidHandle(_)) => self.drop_lost_handle(handle),
            Err(err) => debug!(%handle, error = %err, "Status poll failed"),
        }
        self.publish();
    }

    fn apply_sample(&mut self, handle: DeviceHandle, stamp: u64, status: DeviceStatus) {
        if self.active != Some(handle) {
            debug!(%handle, "Ignoring sample for a released handle");
            return;
        }
        // Unloading is terminal for a handle, so it wins over any stamp.
        if !status.is_loaded {
            self.drop_lost_handle(handle);
            return;
        }
        if stamp <= self.last_applied {
            debug!(stamp, last_applied = self.last_applied, "Ignoring stale sample");
            return;
        }

        self.last_applied = stamp;
        self.transition(PhaseEvent::Sample {
            playing: status.is_playing,
        });
        self.playback.position_ms = status.position_ms;
        if let Some(duration_ms) = status.duration_ms {
            self.playback.duration_ms = duration_ms;
        }
    }

    /// The device unloaded the owned handle on its own. Forget it without
    /// calling the device and go idle; the track stays selected so the host
    /// can retry.
    fn drop_lost_handle(&mut self, handle: DeviceHandle) {
        if self.active != Some(handle) {
            return;
        }
        self.active = None;
        self.transition(PhaseEvent::Release);
        self.playback.position_ms = 0;
        self.playback.duration_ms = 0;
        self.last_applied = self.clock.next();

        let locator = self
            .track
            .as_ref()
            .map(|t| redact_locator(&t.audio_locator))
            .unwrap_or_default();
        warn!(%handle, %locator, "Device unloaded the track");
        self.emit(CoreEvent::Playback(PlaybackEvent::Released { locator }));
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn transition(&mut self, event: PhaseEvent) {
        match self.playback.phase.next(event) {
            Some(phase) => self.playback.phase = phase,
            None => debug!(phase = ?self.playback.phase, ?event, "Inert phase input"),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            playback: self.playback.clamped(),
            presentation: self.presentation.state(),
            track: self.track.clone(),
            last_error: self.last_error.clone(),
            closed_count: self.closed_count,
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is fine.
        let _ = self.events.emit(event);
    }

    fn emit_mode(&self, mode: PresentationMode) {
        let mode = match mode {
            PresentationMode::Minimized => PresentationKind::Minimized,
            PresentationMode::Full => PresentationKind::Full,
        };
        self.emit(CoreEvent::Presentation(PresentationEvent::ModeChanged {
            mode,
        }));
    }
}
