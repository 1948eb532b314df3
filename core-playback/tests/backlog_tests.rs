//! Queue backlog warnings.

mod common;

use bridge_traits::DeviceStatus;
use common::{playing, settle, spawn, FakeDevice};
use core_playback::{SessionConfig, Track};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts warnings emitted by the playback crate.
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::WARN && metadata.target().starts_with("core_playback") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// Current-thread runtime: the worker runs on this thread, so the scoped
// subscriber sees its events.
#[tokio::test]
async fn test_backlog_warns_once_per_burst() {
    let warnings = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let device = FakeDevice::new();
    let config = SessionConfig {
        poll_interval: Duration::from_secs(3600),
        command_queue_warn_depth: 4,
        ..Default::default()
    };
    let (controller, _events) = spawn(&device, config);
    let track = Track::new(
        "https://cdn.example.com/ep1.mp3",
        "https://cdn.example.com/ep1.jpg",
        "Episode 1",
    );

    controller.set_session(Some(track.clone()), true).await.unwrap();
    settle(&controller, playing(&track)).await;
    let handle = device.handle_for(&track.audio_locator).unwrap();
    let listener = device.listener_for(handle).unwrap();
    assert_eq!(warnings.count(), 0);

    for burst in 1..=2 {
        // Queued without yielding, so the worker sees the whole burst.
        for step in 0..20u64 {
            listener(DeviceStatus::loaded(true, step * 100, Some(60_000)));
        }
        controller.on_gesture_move(0).await.unwrap();
        assert_eq!(warnings.count(), burst);
    }

    assert_eq!(controller.state().position_ms, 1_900);
}
