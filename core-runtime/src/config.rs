//! # Core Configuration Module
//!
//! Provides configuration management for the local player core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding every bridge and setting the core needs. It validates
//! eagerly so a misconfigured host fails at startup rather than on the first
//! poll cycle.
//!
//! ## Bridges
//!
//! - `HttpClient` - local endpoint and catalog requests (desktop default: reqwest)
//! - `ProcessInspector` - player / helper detection (desktop default: sysinfo)
//! - `Clock` - cache-busting timestamps (default: system clock)
//!
//! When the `desktop-shims` feature is enabled, missing bridges and the helper
//! launch path are filled in from `bridge-desktop`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, LengthUnit};
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .poll_interval(Duration::from_millis(250))
//!     .length_unit(LengthUnit::Seconds)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! // Below the 50 ms floor.
//! let config = CoreConfig::builder()
//!     .poll_interval(Duration::from_millis(10))
//!     .build()
//!     .expect("Should fail - interval too small");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, HttpClient, ProcessInspector, SystemClock};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Smallest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Core configuration for the local player core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// HTTP transport for the local endpoint and the catalog
    pub http_client: Arc<dyn HttpClient>,

    /// Process table access
    pub process_inspector: Arc<dyn ProcessInspector>,

    /// Time source for the `_` cache-busting parameter
    pub clock: Arc<dyn Clock>,

    /// Local endpoint, token and catalog URLs
    pub endpoints: EndpointConfig,

    /// Player and helper process identification
    pub processes: ProcessConfig,

    /// Poll cadence and status decoding
    pub poll: PollConfig,

    /// Capacity of the event bus broadcast channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("http_client", &"HttpClient { ... }")
            .field("process_inspector", &"ProcessInspector { ... }")
            .field("clock", &"Clock { ... }")
            .field("endpoints", &self.endpoints)
            .field("processes", &self.processes)
            .field("poll", &self.poll)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// URLs of the services the core talks to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the helper's local HTTP service
    pub local_base_url: String,

    /// `Origin` header the local service requires
    pub origin: String,

    /// URL returning the OAuth bearer token as `{"t": "..."}`
    pub oauth_token_url: String,

    /// Base URL of the remote catalog (`{base}/v1/{type}s/{id}`)
    pub catalog_base_url: String,

    /// Optional bearer token attached to catalog requests
    pub catalog_access_token: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            local_base_url: "http://localhost:4380".to_string(),
            origin: "https://embed.spotify.com".to_string(),
            oauth_token_url: "http://open.spotify.com/token".to_string(),
            catalog_base_url: "https://api.spotify.com".to_string(),
            catalog_access_token: None,
        }
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("local_base_url", &self.local_base_url)
            .field("origin", &self.origin)
            .field("oauth_token_url", &self.oauth_token_url)
            .field("catalog_base_url", &self.catalog_base_url)
            .field(
                "catalog_access_token",
                &self.catalog_access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl EndpointConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("local_base_url", &self.local_base_url),
            ("oauth_token_url", &self.oauth_token_url),
            ("catalog_base_url", &self.catalog_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.origin.is_empty() {
            return Err(Error::Config("Origin header cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// How the player and its helper are found and started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Process name of the player
    pub player_process: String,

    /// Process name of the web helper
    pub helper_process: String,

    /// Executable launched when the player runs but the helper does not
    pub helper_path: Option<PathBuf>,

    /// Executable launched by `ensure_player_running`
    pub player_path: Option<PathBuf>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            player_process: "spotify".to_string(),
            helper_process: "SpotifyWebHelper".to_string(),
            helper_path: None,
            player_path: None,
        }
    }
}

/// Unit of the integer `length` field in the player status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// The local service reports whole seconds.
    #[default]
    Seconds,
    Milliseconds,
}

impl LengthUnit {
    /// Interpret a raw `length` value.
    pub fn to_duration(self, raw: u64) -> Duration {
        match self {
            LengthUnit::Seconds => Duration::from_secs(raw),
            LengthUnit::Milliseconds => Duration::from_millis(raw),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Interval of the recurring update task
    pub interval: Duration,

    /// Unit of the status payload's track length
    pub length_unit: LengthUnit,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            length_unit: LengthUnit::default(),
        }
    }
}

impl PollConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval < MIN_POLL_INTERVAL {
            return Err(Error::Config(format!(
                "Poll interval of {}ms is below the minimum of {}ms",
                self.interval.as_millis(),
                MIN_POLL_INTERVAL.as_millis()
            )));
        }
        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Endpoint URLs are http(s)
    /// - Process names are not empty
    /// - Poll interval respects the floor
    /// - Event buffer is non-zero
    pub fn validate(&self) -> Result<()> {
        self.endpoints.validate()?;
        self.poll.validate()?;

        if self.processes.player_process.trim().is_empty() {
            return Err(Error::Config(
                "Player process name cannot be empty".to_string(),
            ));
        }

        if self.processes.helper_process.trim().is_empty() {
            return Err(Error::Config(
                "Helper process name cannot be empty".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Otherwise inject an implementation with .http_client()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Ok(Arc::new(bridge_desktop::ReqwestHttpClient::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_process_inspector() -> Result<Arc<dyn ProcessInspector>> {
    Err(Error::CapabilityMissing {
        capability: "ProcessInspector".to_string(),
        message: "No process inspector provided. \
                 Desktop: enable the 'desktop-shims' feature to use SysinfoProcessInspector. \
                 Otherwise inject an implementation with .process_inspector()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_process_inspector() -> Result<Arc<dyn ProcessInspector>> {
    Ok(Arc::new(bridge_desktop::SysinfoProcessInspector::new()))
}

#[cfg(feature = "desktop-shims")]
fn fill_default_paths(processes: &mut ProcessConfig) {
    if processes.helper_path.is_none() {
        processes.helper_path = bridge_desktop::default_helper_path();
    }
    if processes.player_path.is_none() {
        processes.player_path = bridge_desktop::default_player_path();
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn fill_default_paths(_processes: &mut ProcessConfig) {}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    process_inspector: Option<Arc<dyn ProcessInspector>>,
    clock: Option<Arc<dyn Clock>>,
    endpoints: EndpointConfig,
    processes: ProcessConfig,
    poll: PollConfig,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the process inspector implementation.
    pub fn process_inspector(mut self, inspector: Arc<dyn ProcessInspector>) -> Self {
        self.process_inspector = Some(inspector);
        self
    }

    /// Sets the time source. Default: [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces all endpoint URLs at once.
    pub fn endpoints(mut self, endpoints: EndpointConfig) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Base URL of the local helper service.
    ///
    /// Default: `http://localhost:4380`
    pub fn local_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.local_base_url = url.into();
        self
    }

    /// Base URL of the remote catalog.
    ///
    /// Default: `https://api.spotify.com`
    pub fn catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoints.catalog_base_url = url.into();
        self
    }

    /// Bearer token sent with catalog requests.
    pub fn catalog_access_token(mut self, token: impl Into<String>) -> Self {
        self.endpoints.catalog_access_token = Some(token.into());
        self
    }

    /// Replaces the process settings at once.
    pub fn processes(mut self, processes: ProcessConfig) -> Self {
        self.processes = processes;
        self
    }

    /// Executable launched when the helper is missing.
    pub fn helper_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processes.helper_path = Some(path.into());
        self
    }

    /// Executable launched by `ensure_player_running`.
    pub fn player_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processes.player_path = Some(path.into());
        self
    }

    /// Interval of the recurring update task.
    ///
    /// Default: 1000 ms. Values below [`MIN_POLL_INTERVAL`] fail at `build()`.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    /// Unit of the status payload's track length. Default: seconds.
    pub fn length_unit(mut self, unit: LengthUnit) -> Self {
        self.poll.length_unit = unit;
        self
    }

    /// Capacity of the event bus. Default: 100.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a bridge is missing and no desktop
    ///   default is compiled in
    /// - [`Error::Config`] when a setting is invalid
    pub fn build(self) -> Result<CoreConfig> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let process_inspector = match self.process_inspector {
            Some(inspector) => inspector,
            None => provide_default_process_inspector()?,
        };

        let mut processes = self.processes;
        fill_default_paths(&mut processes);

        let config = CoreConfig {
            http_client,
            process_inspector,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            endpoints: self.endpoints,
            processes,
            poll: self.poll,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
