//! Shared test device for the session and host suites.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::{BridgeError, DeviceHandle, DeviceStatus, PlaybackDevice, StatusListener};
use core_playback::{PlaybackPhase, SessionConfig, SessionController, SessionSnapshot, Track};
use core_runtime::events::EventBus;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Notify};

/// Device calls in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire(String),
    Play(DeviceHandle),
    Pause(DeviceHandle),
    Seek(DeviceHandle, u64),
    Release(DeviceHandle),
}

#[derive(Default)]
struct Inner {
    live: HashSet<DeviceHandle>,
    max_live: usize,
    uris: HashMap<DeviceHandle, String>,
    statuses: HashMap<DeviceHandle, DeviceStatus>,
    listeners: HashMap<DeviceHandle, StatusListener>,
    calls: Vec<Call>,
    released: Vec<DeviceHandle>,

    gated: bool,
    gates: Vec<(String, oneshot::Sender<()>)>,
    failing: HashSet<String>,
    duration_ms: Option<u64>,
    echo_stale_on_pause: bool,
    fail_release: bool,
}

/// In-memory [`PlaybackDevice`] that tracks live handles.
///
/// In gated mode every acquire blocks until the test calls [`resolve`](Self::resolve).
pub struct FakeDevice {
    inner: Mutex<Inner>,
    acquired: Notify,
}

impl FakeDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                duration_ms: Some(60_000),
                ..Default::default()
            }),
            acquired: Notify::new(),
        })
    }

    pub fn gated() -> Arc<Self> {
        let device = Self::new();
        device.inner.lock().gated = true;
        device
    }

    pub fn set_duration(&self, duration_ms: Option<u64>) {
        self.inner.lock().duration_ms = duration_ms;
    }

    pub fn fail_uri(&self, uri: &str) {
        self.inner.lock().failing.insert(uri.to_string());
    }

    pub fn clear_failures(&self) {
        self.inner.lock().failing.clear();
    }

    /// Replay the pre-pause status through the listener while `pause` is in
    /// flight, like an engine whose notification races the command.
    pub fn echo_stale_on_pause(&self) {
        self.inner.lock().echo_stale_on_pause = true;
    }

    pub fn fail_release(&self) {
        self.inner.lock().fail_release = true;
    }

    /// Let the oldest gated acquire for `uri` complete.
    pub async fn resolve(&self, uri: &str) {
        loop {
            let notified = self.acquired.notified();
            {
                let mut inner = self.inner.lock();
                if let Some(index) = inner.gates.iter().position(|(u, _)| u == uri) {
                    let (_, gate) = inner.gates.remove(index);
                    let _ = gate.send(());
                    return;
                }
            }
            notified.await;
        }
    }

    /// Store `status` and push it through the handle's listener.
    pub fn emit(&self, handle: DeviceHandle, status: DeviceStatus) {
        let listener = {
            let mut inner = self.inner.lock();
            inner.statuses.insert(handle, status);
            inner.listeners.get(&handle).cloned()
        };
        if let Some(listener) = listener {
            listener(status);
        }
    }

    /// Change the status without notifying; only a poll will see it.
    pub fn set_status(&self, handle: DeviceHandle, status: DeviceStatus) {
        self.inner.lock().statuses.insert(handle, status);
    }

    /// The engine drops `handle` on its own, e.g. after a decode error.
    /// No release call is recorded.
    pub fn unload(&self, handle: DeviceHandle) {
        let mut inner = self.inner.lock();
        inner.live.remove(&handle);
        inner.listeners.remove(&handle);
        inner.statuses.remove(&handle);
    }

    pub fn listener_for(&self, handle: DeviceHandle) -> Option<StatusListener> {
        self.inner.lock().listeners.get(&handle).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    pub fn max_live(&self) -> usize {
        self.inner.lock().max_live
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn released(&self) -> Vec<DeviceHandle> {
        self.inner.lock().released.clone()
    }

    /// Live handle currently loaded from `uri`.
    pub fn handle_for(&self, uri: &str) -> Option<DeviceHandle> {
        let inner = self.inner.lock();
        inner
            .live
            .iter()
            .copied()
            .find(|handle| inner.uris.get(handle).map(String::as_str) == Some(uri))
    }

    fn check_live(inner: &Inner, handle: DeviceHandle) -> Result<()> {
        if inner.live.contains(&handle) {
            Ok(())
        } else {
            Err(BridgeError::InvalidHandle(handle.to_string()))
        }
    }
}

#[async_trait]
impl PlaybackDevice for FakeDevice {
    async fn acquire(&self, uri: &str, autoplay: bool) -> Result<DeviceHandle> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::Acquire(uri.to_string()));
            if inner.gated {
                let (tx, rx) = oneshot::channel();
                inner.gates.push((uri.to_string(), tx));
                Some(rx)
            } else {
                None
            }
        };
        self.acquired.notify_waiters();

        if let Some(gate) = gate {
            gate.await
                .map_err(|_| BridgeError::OperationFailed("gate dropped".to_string()))?;
        }

        let mut inner = self.inner.lock();
        if inner.failing.contains(uri) {
            return Err(BridgeError::OperationFailed(format!("cannot load {uri}")));
        }

        let handle = DeviceHandle::new();
        inner.live.insert(handle);
        inner.max_live = inner.max_live.max(inner.live.len());
        inner.uris.insert(handle, uri.to_string());
        let duration_ms = inner.duration_ms;
        inner
            .statuses
            .insert(handle, DeviceStatus::loaded(autoplay, 0, duration_ms));
        Ok(handle)
    }

    async fn play(&self, handle: DeviceHandle) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Play(handle));
        Self::check_live(&inner, handle)?;
        if let Some(status) = inner.statuses.get_mut(&handle) {
            status.is_playing = true;
        }
        Ok(())
    }

    async fn pause(&self, handle: DeviceHandle) -> Result<()> {
        let echo = {
            let mut inner = self.inner.lock();
            inner.calls.push(Call::Pause(handle));
            Self::check_live(&inner, handle)?;
            if inner.echo_stale_on_pause {
                inner
                    .listeners
                    .get(&handle)
                    .cloned()
                    .zip(inner.statuses.get(&handle).copied())
            } else {
                None
            }
        };
        if let Some((listener, before)) = echo {
            listener(before);
        }

        let mut inner = self.inner.lock();
        if let Some(status) = inner.statuses.get_mut(&handle) {
            status.is_playing = false;
        }
        Ok(())
    }

    async fn seek(&self, handle: DeviceHandle, position_ms: u64) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Seek(handle, position_ms));
        Self::check_live(&inner, handle)?;
        if let Some(status) = inner.statuses.get_mut(&handle) {
            status.position_ms = match status.duration_ms {
                Some(duration_ms) => position_ms.min(duration_ms),
                None => position_ms,
            };
        }
        Ok(())
    }

    async fn release(&self, handle: DeviceHandle) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Release(handle));
        if inner.live.remove(&handle) {
            inner.released.push(handle);
        }
        inner.listeners.remove(&handle);
        inner.statuses.remove(&handle);
        if inner.fail_release {
            return Err(BridgeError::OperationFailed("release failed".to_string()));
        }
        Ok(())
    }

    async fn status(&self, handle: DeviceHandle) -> Result<DeviceStatus> {
        let inner = self.inner.lock();
        Self::check_live(&inner, handle)?;
        Ok(inner
            .statuses
            .get(&handle)
            .copied()
            .unwrap_or_else(DeviceStatus::unloaded))
    }

    async fn subscribe(&self, handle: DeviceHandle, listener: StatusListener) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_live(&inner, handle)?;
        inner.listeners.insert(handle, listener);
        Ok(())
    }
}

/// Session config with the poll pushed out of the way.
pub fn quiet_config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::from_secs(3600),
        ..Default::default()
    }
}

pub fn spawn(device: &Arc<FakeDevice>, config: SessionConfig) -> (SessionController, EventBus) {
    let events = EventBus::default();
    let device: Arc<dyn PlaybackDevice> = device.clone();
    let controller =
        SessionController::spawn(device, config, events.clone()).expect("valid config");
    (controller, events)
}

/// Snapshot predicate: `track` is loaded and playing.
pub fn playing(track: &Track) -> impl FnMut(&SessionSnapshot) -> bool + '_ {
    move |s: &SessionSnapshot| {
        s.track.as_ref() == Some(track) && s.playback.phase == PlaybackPhase::Playing
    }
}

/// Wait until a published snapshot satisfies `predicate`.
pub async fn settle<F>(controller: &SessionController, predicate: F) -> SessionSnapshot
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    let mut rx = controller.watch();
    let snapshot = tokio::time::timeout(Duration::from_secs(30), rx.wait_for(predicate))
        .await
        .expect("snapshot never settled")
        .expect("controller stopped")
        .clone();
    snapshot
}

/// Poll `condition` until it holds.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(30), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never held");
}

/// Run `future` with a timeout so a hung controller fails the test.
pub async fn bounded<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(30), future)
        .await
        .expect("operation hung")
}
