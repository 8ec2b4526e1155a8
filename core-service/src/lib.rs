//! Core service façade and bootstrap helpers.
//!
//! This crate wires a validated [`CoreConfig`] into a ready-to-use core: one
//! event bus, one catalog client shared by every entity, and one state poller.
//! Desktop apps typically enable the `desktop-shims` feature so missing
//! bridges fall back to the `bridge-desktop` implementations.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_catalog::{Album, Artist, CatalogClient, ResourceUri, Track};
use core_player::{AutoUpdateHandle, PlayerSnapshot, StatePoller};
use core_runtime::events::EventStream;
use core_runtime::{CoreConfig, EventBus, PlayerEvent};
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    event_bus: EventBus,
    catalog: Arc<CatalogClient>,
    poller: Arc<StatePoller>,
}

impl CoreService {
    /// Create a new service from a configuration.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);

        let mut catalog =
            CatalogClient::new(config.http_client.clone(), config.endpoints.catalog_base_url.clone());
        if let Some(token) = &config.endpoints.catalog_access_token {
            catalog = catalog.with_access_token(token.clone());
        }
        let catalog = Arc::new(catalog);

        let poller = Arc::new(StatePoller::from_config(
            &config,
            catalog.clone(),
            event_bus.clone(),
        ));

        info!(
            local = %config.endpoints.local_base_url,
            catalog = %config.endpoints.catalog_base_url,
            "Core service initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            event_bus,
            catalog,
            poller,
        })
    }

    /// Service built entirely from desktop defaults.
    #[cfg(feature = "desktop-shims")]
    pub fn bootstrap_desktop() -> Result<Self> {
        Self::new(CoreConfig::builder().build()?)
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Stream of every event published from now on.
    pub fn subscribe(&self) -> EventStream {
        EventStream::new(self.event_bus.subscribe())
    }

    pub fn catalog(&self) -> Arc<CatalogClient> {
        Arc::clone(&self.catalog)
    }

    pub fn poller(&self) -> Arc<StatePoller> {
        Arc::clone(&self.poller)
    }

    /// Run one poll cycle.
    pub async fn update(&self) -> Result<Vec<PlayerEvent>> {
        Ok(self.poller.update().await?)
    }

    /// Poll at the configured interval until the handle is dropped.
    pub fn start_auto_update(&self) -> Result<AutoUpdateHandle> {
        Ok(self.poller.start_auto_update(self.config.poll.interval)?)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.poller.snapshot()
    }

    /// Start the player if it is not running. Returns `true` when launched.
    pub fn ensure_player_running(&self) -> Result<bool> {
        Ok(self.poller.ensure_player_running()?)
    }

    /// Unresolved track handle; fields are fetched on first access.
    pub fn track(&self, name: impl Into<String>, uri: impl Into<ResourceUri>) -> Track {
        Track::new(name, uri.into(), self.catalog())
    }

    pub fn album(&self, name: impl Into<String>, uri: impl Into<ResourceUri>) -> Album {
        Album::new(name, uri.into(), self.catalog())
    }

    pub fn artist(&self, name: impl Into<String>, uri: impl Into<ResourceUri>) -> Artist {
        Artist::new(name, uri.into(), self.catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpRequest, HttpResponse, ProcessInspector};
    use core_player::Availability;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CatalogOnlyHttp {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for CatalogOnlyHttp {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(
                request.headers.get("Authorization").map(String::as_str),
                Some("Bearer BQD")
            );
            Ok(HttpResponse::new(
                200,
                r#"{"name":"Radiohead","uri":"spotify:artist:4Z8W4fKeB5YxbusRsdQVPb","genres":["art rock"]}"#,
            ))
        }
    }

    struct NothingRunning;

    impl ProcessInspector for NothingRunning {
        fn is_running(&self, _name: &str) -> bool {
            false
        }

        fn launch(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn service(http: Arc<CatalogOnlyHttp>) -> CoreService {
        let config = CoreConfig::builder()
            .http_client(http)
            .process_inspector(Arc::new(NothingRunning))
            .catalog_access_token("BQD")
            .build()
            .unwrap();
        CoreService::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_idle_update() {
        let http = Arc::new(CatalogOnlyHttp::default());
        let core = service(http.clone());

        assert!(core.update().await.unwrap().is_empty());
        assert_eq!(core.snapshot().availability, Availability::Unavailable);
        assert_eq!(http.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_catalog_lookups_share_client() {
        let http = Arc::new(CatalogOnlyHttp::default());
        let core = service(http.clone());

        let artist = core.artist("Radiohead", "spotify:artist:4Z8W4fKeB5YxbusRsdQVPb");
        assert_eq!(artist.genres().await.unwrap(), vec!["art rock".to_string()]);
        assert_eq!(artist.genres().await.unwrap().len(), 1);
        assert_eq!(http.calls.load(Ordering::SeqCst), 1);

        let track = core.track("Airbag", "spotify:track:1");
        assert_eq!(track.uri().as_str(), "spotify:track:1");
    }

    #[tokio::test]
    async fn test_auto_update_uses_configured_interval() {
        let core = service(Arc::new(CatalogOnlyHttp::default()));

        let handle = core.start_auto_update().unwrap();
        assert!(handle.is_running());
        handle.stop().await;
    }
}
