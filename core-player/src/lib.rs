//! # Core Player
//!
//! Live state of the locally running player.
//!
//! ## Overview
//!
//! The player exposes its state through a companion web helper listening on
//! a local port. [`StatePoller`] watches both processes, authorizes against
//! the helper, polls `remote/status.json` and derives change events from
//! consecutive polls:
//!
//! - [`PlayerEvent::AvailabilityChanged`](core_runtime::PlayerEvent::AvailabilityChanged)
//! - [`PlayerEvent::TrackChanged`](core_runtime::PlayerEvent::TrackChanged)
//! - [`PlayerEvent::VolumeChanged`](core_runtime::PlayerEvent::VolumeChanged)
//! - [`PlayerEvent::PlayStateChanged`](core_runtime::PlayerEvent::PlayStateChanged)
//! - [`PlayerEvent::PlayingTimeChanged`](core_runtime::PlayerEvent::PlayingTimeChanged)
//!
//! The current track is a lazily resolved [`core_catalog::Track`].
//!
//! ## Usage
//!
//! ```ignore
//! let poller = Arc::new(StatePoller::from_config(&config, catalog, event_bus.clone()));
//!
//! // one cycle
//! for event in poller.update().await? {
//!     println!("{:?}", event);
//! }
//!
//! // or a background loop
//! let handle = poller.start_auto_update(Duration::from_millis(500))?;
//! ```

pub mod client;
pub mod error;
pub mod poller;
pub mod state;
pub mod status;

pub use client::LocalPlayerClient;
pub use error::{PlayerError, Result};
pub use poller::{AutoUpdateHandle, StatePoller};
pub use state::{Availability, PlayerSnapshot, PlayerState};
pub use status::{StatusResource, StatusResponse, StatusTrack};
