//! # Host Bridge Traits
//!
//! Capability contracts the player core consumes from its host.
//!
//! ## Overview
//!
//! The core never talks to the network, the process table or the system clock
//! directly. Each of those is a trait defined here and implemented per host
//! (`bridge-desktop` for macOS, Windows and Linux). Tests substitute mocks.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP for the local player endpoint and the catalog
//! - [`ProcessInspector`](process::ProcessInspector) - Process detection and launch
//! - [`Clock`](time::Clock) - Time source for cache-busting and deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert platform errors into it and include context such as the URL or
//! executable path involved.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single instance can be shared
//! between the poll loop and catalog lookups.

pub mod error;
pub mod http;
pub mod process;
pub mod time;

pub use error::BridgeError;

pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use process::ProcessInspector;
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
