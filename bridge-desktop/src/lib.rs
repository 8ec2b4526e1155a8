//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `ProcessInspector` using `sysinfo` for detection and `std::process` for launch
//! - Default install locations of the player and its web helper using `dirs`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SysinfoProcessInspector};
//! use bridge_traits::ProcessInspector;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     let processes = SysinfoProcessInspector::new();
//!     println!("player running: {}", processes.is_running("spotify"));
//! }
//! ```

mod http;
mod paths;
mod process;

pub use http::ReqwestHttpClient;
pub use paths::{default_helper_path, default_player_path};
pub use process::SysinfoProcessInspector;
