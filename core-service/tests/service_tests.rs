//! End-to-end wiring: catalog → player host → device.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, DeviceHandle, DeviceStatus, Document, DocumentStore, PlaybackDevice,
    StatusListener,
};
use core_catalog::CatalogError;
use core_playback::{PlaybackPhase, SessionConfig};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CatalogEvent, CoreEvent, PlaybackEvent};
use core_service::{CoreError, CoreService};
use mockall::mock;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ShelfStore;

#[async_trait]
impl DocumentStore for ShelfStore {
    async fn list_all(&self, collection: &str) -> BridgeResult<Vec<Document>> {
        if collection != "podcasts" {
            return Ok(Vec::new());
        }
        Ok(vec![
            Document::new("p1")
                .with_field("title", "Pilot")
                .with_field("audioURL", "https://cdn.example.com/p1.mp3?token=abc")
                .with_field("coverURL", "https://cdn.example.com/p1.jpg")
                .with_field("category", "Kişisel")
                .with_field("createdAt", "2024-01-01T00:00:00Z"),
            Document::new("p2")
                .with_field("title", "Second")
                .with_field("audioURL", "https://cdn.example.com/p2.mp3")
                .with_field("coverURL", "https://cdn.example.com/p2.jpg")
                .with_field("category", "Sağlık")
                .with_field("createdAt", "2024-02-01T00:00:00Z"),
        ])
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn list_all(&self, collection: &str) -> BridgeResult<Vec<Document>>;
    }
}

/// Loads instantly and plays; tracks live handles.
#[derive(Default)]
struct InstantDevice {
    live: Mutex<HashSet<DeviceHandle>>,
}

impl InstantDevice {
    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    fn check(&self, handle: DeviceHandle) -> BridgeResult<()> {
        if self.live.lock().unwrap().contains(&handle) {
            Ok(())
        } else {
            Err(BridgeError::InvalidHandle(handle.to_string()))
        }
    }
}

#[async_trait]
impl PlaybackDevice for InstantDevice {
    async fn acquire(&self, _uri: &str, _autoplay: bool) -> BridgeResult<DeviceHandle> {
        let handle = DeviceHandle::new();
        self.live.lock().unwrap().insert(handle);
        Ok(handle)
    }

    async fn play(&self, handle: DeviceHandle) -> BridgeResult<()> {
        self.check(handle)
    }

    async fn pause(&self, handle: DeviceHandle) -> BridgeResult<()> {
        self.check(handle)
    }

    async fn seek(&self, handle: DeviceHandle, _position_ms: u64) -> BridgeResult<()> {
        self.check(handle)
    }

    async fn release(&self, handle: DeviceHandle) -> BridgeResult<()> {
        self.live.lock().unwrap().remove(&handle);
        Ok(())
    }

    async fn status(&self, handle: DeviceHandle) -> BridgeResult<DeviceStatus> {
        self.check(handle)?;
        Ok(DeviceStatus::loaded(true, 0, Some(120_000)))
    }

    async fn subscribe(&self, handle: DeviceHandle, _listener: StatusListener) -> BridgeResult<()> {
        self.check(handle)
    }
}

fn service(device: Arc<InstantDevice>) -> CoreService {
    let config = CoreConfig::builder()
        .document_store(Arc::new(ShelfStore))
        .playback_device(device)
        .build()
        .unwrap();
    CoreService::new(config, SessionConfig::default()).unwrap()
}

#[tokio::test]
async fn test_newest_podcast_plays_through_host() {
    let device = Arc::new(InstantDevice::default());
    let core = service(device.clone());
    let mut events = core.subscribe();

    let newest = core.catalog().newest(1).await.unwrap();
    assert_eq!(newest[0].id, "p2");

    let mut host = core.player_host().unwrap();
    host.select(newest[0].track()).await.unwrap();

    let mut rx = host.controller().watch();
    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.playback.phase == PlaybackPhase::Playing),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(device.live_count(), 1);

    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Catalog(CatalogEvent::Loaded { count: 2, .. })
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::Loading { .. })
    ));

    host.unmount().await.unwrap();
    assert_eq!(device.live_count(), 0);
}

#[tokio::test]
async fn test_locators_are_redacted_in_events() {
    let device = Arc::new(InstantDevice::default());
    let core = service(device);
    let mut events = core
        .subscribe()
        .filter(|e| matches!(e, CoreEvent::Playback(PlaybackEvent::Loading { .. })));

    let podcasts = core.catalog().podcasts().await.unwrap();
    let mut host = core.player_host().unwrap();
    host.play_first(&[podcasts[0].track()]).await.unwrap();

    match events.recv().await.unwrap() {
        CoreEvent::Playback(PlaybackEvent::Loading { locator }) => {
            assert_eq!(locator, "https://cdn.example.com/p1.mp3?[REDACTED]");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_invalid_session_config_is_rejected() {
    let config = CoreConfig::builder()
        .document_store(Arc::new(ShelfStore))
        .playback_device(Arc::new(InstantDevice::default()))
        .build()
        .unwrap();
    let session = SessionConfig {
        poll_interval: Duration::ZERO,
        ..Default::default()
    };

    assert!(matches!(
        CoreService::new(config, session),
        Err(CoreError::Playback(_))
    ));
}

#[test]
fn test_player_host_requires_runtime() {
    let core = service(Arc::new(InstantDevice::default()));
    assert!(matches!(
        core.player_host(),
        Err(CoreError::InitializationFailed(_))
    ));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_core_error() {
    let mut store = MockStore::new();
    store
        .expect_list_all()
        .times(1)
        .returning(|_| Err(BridgeError::StoreError("unavailable".to_string())));

    let config = CoreConfig::builder()
        .document_store(Arc::new(store))
        .playback_device(Arc::new(InstantDevice::default()))
        .build()
        .unwrap();
    let core = CoreService::new(config, SessionConfig::default()).unwrap();

    let result: core_service::Result<_> = core.catalog().newest(3).await.map_err(CoreError::from);
    assert!(matches!(
        result,
        Err(CoreError::Catalog(CatalogError::Store(BridgeError::StoreError(_))))
    ));
}
