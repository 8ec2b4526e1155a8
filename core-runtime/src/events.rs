//! # Event Bus System
//!
//! Broadcasts player changes to any number of subscribers using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: typed enums for player state changes and session lifecycle
//! - **EventBus**: central broadcast channel for publishing events
//! - **EventStream**: wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     emit      ┌───────────┐     subscribe    ┌────────────┐
//! │ State Poller ├──────────────>│ EventBus  ├─────────────────>│ Subscriber │
//! └──────────────┘               │ (broadcast│                  └────────────┘
//!                                │  channel) │     subscribe    ┌────────────┐
//!                                │           ├─────────────────>│ Subscriber │
//!                                └───────────┘                  └────────────┘
//! ```
//!
//! The poller emits only after every field of a cycle is settled, so a
//! subscriber reading the poller's snapshot on receipt sees the new state.
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlayerEvent};
//!
//! let event_bus = EventBus::new(100);
//! let event = CoreEvent::Player(PlayerEvent::VolumeChanged {
//!     previous: 0.5,
//!     volume: 0.8,
//! });
//!
//! event_bus.emit(event).ok();
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus};
//! use tokio::sync::broadcast::error::RecvError;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! tokio::spawn(async move {
//!     loop {
//!         match stream.recv().await {
//!             Ok(event) => println!("Received: {}", event.description()),
//!             Err(RecvError::Lagged(n)) => eprintln!("Missed {} events", n),
//!             Err(RecvError::Closed) => break,
//!         }
//!     }
//! });
//! # }
//! ```
//!
//! ## Event Types
//!
//! ### Player Events
//! - `AvailabilityChanged`: player and helper came up, or one of them went away
//! - `TrackChanged`: a different track is loaded
//! - `VolumeChanged`: volume differs from the previous cycle
//! - `PlayStateChanged`: playback started or paused
//! - `PlayingTimeChanged`: playback position moved
//!
//! ### Session Events
//! - `HelperLaunched` / `HelperLaunchFailed`: helper start attempts
//! - `TokensAcquired` / `TokenError`: boot outcome
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: subscriber was too slow and missed `n` events.
//!   Non-fatal; the subscriber keeps receiving new events.
//! - **`RecvError::Closed`**: all senders dropped. Treat as shutdown.

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

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Player state changes derived by the poller
    Player(PlayerEvent),
    /// Helper process and token lifecycle
    Session(SessionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Player(e) => e.description(),
            CoreEvent::Session(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Session(SessionEvent::TokenError { .. }) => EventSeverity::Error,
            CoreEvent::Session(SessionEvent::HelperLaunchFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Player(PlayerEvent::AvailabilityChanged { .. }) => EventSeverity::Info,
            CoreEvent::Player(PlayerEvent::TrackChanged { .. }) => EventSeverity::Info,
            CoreEvent::Session(SessionEvent::TokensAcquired) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

impl From<PlayerEvent> for CoreEvent {
    fn from(event: PlayerEvent) -> Self {
        CoreEvent::Player(event)
    }
}

impl From<SessionEvent> for CoreEvent {
    fn from(event: SessionEvent) -> Self {
        CoreEvent::Session(event)
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
// Player Events
// ============================================================================

/// Changes derived by comparing two consecutive player states.
///
/// Within one poll cycle events are produced in declaration order, at most
/// one per variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// Player and helper both running (`true`) or one of them stopped (`false`).
    AvailabilityChanged { available: bool },
    /// A different track is loaded.
    TrackChanged {
        /// URI of the track loaded in the previous cycle, if any.
        previous_uri: Option<String>,
        /// URI of the newly loaded track.
        uri: String,
        /// Display name of the newly loaded track.
        name: String,
    },
    /// Volume in `[0.0, 1.0]`.
    VolumeChanged { previous: f64, volume: f64 },
    /// Playback started (`true`) or paused (`false`).
    PlayStateChanged { playing: bool },
    /// Playback position, in seconds.
    PlayingTimeChanged { previous: f64, position: f64 },
}

impl PlayerEvent {
    fn description(&self) -> &str {
        match self {
            PlayerEvent::AvailabilityChanged { available: true } => "Player became available",
            PlayerEvent::AvailabilityChanged { available: false } => "Player became unavailable",
            PlayerEvent::TrackChanged { .. } => "Track changed",
            PlayerEvent::VolumeChanged { .. } => "Volume changed",
            PlayerEvent::PlayStateChanged { playing: true } => "Playback started",
            PlayerEvent::PlayStateChanged { playing: false } => "Playback paused",
            PlayerEvent::PlayingTimeChanged { .. } => "Playing time changed",
        }
    }
}

// ============================================================================
// Session Events
// ============================================================================

/// Helper process and token lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// The helper executable was started.
    HelperLaunched { path: String },
    /// The helper executable could not be started.
    HelperLaunchFailed { path: Option<String>, message: String },
    /// CSRF and OAuth tokens were acquired.
    TokensAcquired,
    /// Token acquisition failed; the player stays unavailable.
    TokenError { message: String },
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::HelperLaunched { .. } => "Web helper launched",
            SessionEvent::HelperLaunchFailed { .. } => "Web helper launch failed",
            SessionEvent::TokensAcquired => "Session tokens acquired",
            SessionEvent::TokenError { .. } => "Session token acquisition failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for broadcasting events to multiple subscribers.
///
/// Cloning is cheap and every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// A subscriber falling behind by more than `capacity` events receives
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: impl Into<CoreEvent>) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event.into())
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
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

/// A wrapper around `broadcast::Receiver` with filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream, PlayerEvent};
///
/// let event_bus = EventBus::new(100);
/// let track_changes = EventStream::new(event_bus.subscribe()).filter(|event| {
///     matches!(event, CoreEvent::Player(PlayerEvent::TrackChanged { .. }))
/// });
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

    /// Only events matching `predicate` are returned by `recv()`.
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
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn track_changed(uri: &str) -> CoreEvent {
        CoreEvent::Player(PlayerEvent::TrackChanged {
            previous_uri: None,
            uri: uri.to_string(),
            name: "Karma Police".to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(PlayerEvent::PlayStateChanged { playing: true }).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = track_changed("spotify:track:63OQupATfueTdZMWTxW03A");
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        bus.emit(PlayerEvent::AvailabilityChanged { available: true }).unwrap();
        bus.emit(PlayerEvent::VolumeChanged { previous: 0.0, volume: 0.5 }).unwrap();

        assert_eq!(
            sub.recv().await.unwrap(),
            CoreEvent::Player(PlayerEvent::AvailabilityChanged { available: true })
        );
        assert_eq!(
            sub.recv().await.unwrap(),
            CoreEvent::Player(PlayerEvent::VolumeChanged { previous: 0.0, volume: 0.5 })
        );
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Player(PlayerEvent::TrackChanged { .. })));

        bus.emit(PlayerEvent::VolumeChanged { previous: 0.1, volume: 0.2 }).unwrap();
        let wanted = track_changed("spotify:track:1");
        bus.emit(wanted.clone()).unwrap();

        assert_eq!(stream.recv().await.unwrap(), wanted);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(PlayerEvent::PlayingTimeChanged {
                previous: f64::from(i),
                position: f64::from(i + 1),
            })
            .ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error = CoreEvent::Session(SessionEvent::TokenError {
            message: "csrf rejected".to_string(),
        });
        assert_eq!(error.severity(), EventSeverity::Error);

        let info = CoreEvent::Player(PlayerEvent::AvailabilityChanged { available: false });
        assert_eq!(info.severity(), EventSeverity::Info);

        let debug = CoreEvent::Player(PlayerEvent::VolumeChanged { previous: 0.0, volume: 1.0 });
        assert_eq!(debug.severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        let event = CoreEvent::Player(PlayerEvent::PlayStateChanged { playing: false });
        assert_eq!(event.description(), "Playback paused");

        let event = CoreEvent::Session(SessionEvent::TokensAcquired);
        assert_eq!(event.description(), "Session tokens acquired");
    }

    #[test]
    fn test_event_serialization() {
        let event = track_changed("spotify:track:63OQupATfueTdZMWTxW03A");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Player\""));
        assert!(json.contains("\"event\":\"TrackChanged\""));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_try_recv_skips_filtered() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Session(_)));

        bus.emit(PlayerEvent::PlayStateChanged { playing: true }).unwrap();
        assert!(stream.try_recv().is_none());

        bus.emit(SessionEvent::TokensAcquired).unwrap();
        assert_eq!(
            stream.try_recv().unwrap().unwrap(),
            CoreEvent::Session(SessionEvent::TokensAcquired)
        );
    }
}
