//! # Event Bus System
//!
//! Typed notifications for the podcast core, delivered over
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event Types**: one enum per domain, wrapped by [`CoreEvent`]
//! - **EventBus**: cloneable broadcast sender shared by every producer
//! - **EventStream**: receiver wrapper with an optional predicate
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   emit    ┌───────────┐
//! │ SessionController├──────────>│           │   subscribe   ┌────────────┐
//! └──────────────────┘           │ EventBus  ├──────────────>│ PlayerHost │
//!                                │ (broadcast│               └────────────┘
//! ┌──────────────────┐   emit    │  channel) │   subscribe   ┌────────────┐
//! │ CatalogService   ├──────────>│           ├──────────────>│ Host UI    │
//! └──────────────────┘           └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PresentationEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Presentation(PresentationEvent::Closed)).ok();
//! assert_eq!(
//!     rx.recv().await.unwrap(),
//!     CoreEvent::Presentation(PresentationEvent::Closed)
//! );
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell `n` events behind. Non-fatal.
//! - **`RecvError::Closed`**: every sender is gone, treat as shutdown.
//!
//! `emit` fails only when nobody is subscribed. Producers ignore that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback session lifecycle
    Playback(PlaybackEvent),
    /// Player presentation (minimized/full, close)
    Presentation(PresentationEvent),
    /// Catalog loads
    Catalog(CatalogEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Presentation(e) => e.description(),
            CoreEvent::Catalog(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Catalog(CatalogEvent::LoadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::StaleLoadDiscarded { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Catalog(CatalogEvent::Loaded { skipped, .. }) if *skipped > 0 => {
                EventSeverity::Warning
            }
            CoreEvent::Playback(PlaybackEvent::Loaded { .. })
            | CoreEvent::Presentation(PresentationEvent::Closed)
            | CoreEvent::Catalog(CatalogEvent::Loaded { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events emitted by the playback session controller.
///
/// Locators are redacted before they are placed in an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// An acquire was issued to the device.
    Loading {
        /// Audio locator being loaded.
        locator: String,
    },
    /// The device handle was installed as the active session.
    Loaded {
        locator: String,
        /// Whether the transport was started on load.
        autoplay: bool,
    },
    /// Loading failed; the session returned to idle.
    LoadFailed {
        locator: String,
        /// Human-readable error message.
        message: String,
        /// Whether a retry (calling `set_session` again) may succeed.
        recoverable: bool,
    },
    /// An acquire resolved after its track stopped being the desired one.
    StaleLoadDiscarded { locator: String },
    /// Transport started or resumed.
    Resumed { position_ms: u64 },
    /// Transport paused.
    Paused { position_ms: u64 },
    /// Play head moved by a seek command.
    Seeked { position_ms: u64, duration_ms: u64 },
    /// The active handle was released and the session reset to idle.
    Released { locator: String },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::Loading { .. } => "Loading track",
            PlaybackEvent::Loaded { .. } => "Track loaded",
            PlaybackEvent::LoadFailed { .. } => "Track failed to load",
            PlaybackEvent::StaleLoadDiscarded { .. } => "Discarded stale track load",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Seeked { .. } => "Playback position changed",
            PlaybackEvent::Released { .. } => "Playback session released",
        }
    }
}

// ============================================================================
// Presentation Events
// ============================================================================

/// Presentation mode as carried on the bus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PresentationKind {
    Minimized,
    Full,
}

/// Events emitted when the player's presentation changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PresentationEvent {
    /// The player switched between minimized and full.
    ModeChanged { mode: PresentationKind },
    /// The player was closed from the minimized bar and its session torn down.
    ///
    /// Emitted exactly once per close.
    Closed,
}

impl PresentationEvent {
    fn description(&self) -> &str {
        match self {
            PresentationEvent::ModeChanged { .. } => "Player presentation changed",
            PresentationEvent::Closed => "Player closed",
        }
    }
}

// ============================================================================
// Catalog Events
// ============================================================================

/// Events emitted by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CatalogEvent {
    /// A collection was listed and decoded.
    Loaded {
        /// Store collection name.
        collection: String,
        /// Documents decoded successfully.
        count: usize,
        /// Malformed documents that were skipped.
        skipped: usize,
    },
    /// Listing a collection failed.
    LoadFailed { collection: String, message: String },
}

impl CatalogEvent {
    fn description(&self) -> &str {
        match self {
            CatalogEvent::Loaded { .. } => "Catalog collection loaded",
            CatalogEvent::LoadFailed { .. } => "Catalog collection failed to load",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Clone it to share one channel between producers. Each `subscribe()` call
/// yields an independent receiver that only sees events emitted afterwards.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` that can skip events not matching a predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let playback_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Playback(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`/`try_recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking receive. `None` means nothing matching is queued right now.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
