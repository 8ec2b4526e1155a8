//! Player state model and change detection.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use core_catalog::{format_minutes, Album, Artist, CatalogClient, ResourceUri, Track};
use core_runtime::{LengthUnit, PlayerEvent};
use serde::{Deserialize, Serialize};

use crate::status::StatusResponse;

/// Whether the player and its helper are both up and authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Unavailable,
    /// Processes found, tokens being acquired.
    Booting,
    Available,
}

impl Availability {
    pub fn is_available(self) -> bool {
        self == Availability::Available
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Unavailable => write!(f, "unavailable"),
            Availability::Booting => write!(f, "booting"),
            Availability::Available => write!(f, "available"),
        }
    }
}

/// Everything one status poll reports. Rebuilt from scratch every cycle.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub track: Option<Track>,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub play_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    /// Seconds into the current track.
    pub position: f64,
    pub volume: f64,
    pub online: bool,
    pub running: bool,
    pub version: Option<u32>,
    pub client_version: Option<String>,
    pub server_time: Option<i64>,
}

impl PlayerState {
    /// Build the state reported by `status`.
    ///
    /// The previous cycle's [`Track`] is kept when the URI is unchanged so its
    /// resolved fields survive across polls.
    pub fn from_status(
        status: StatusResponse,
        previous: &PlayerState,
        catalog: &Arc<CatalogClient>,
        length_unit: LengthUnit,
    ) -> Self {
        let track = status.track.as_ref().and_then(|block| {
            let (name, uri) = block.track_resource.as_ref()?.identified()?;

            if let Some(current) = previous.track.as_ref().filter(|t| t.uri().as_str() == uri) {
                return Some(current.clone());
            }

            let artist = block
                .artist_resource
                .as_ref()
                .and_then(|r| r.identified())
                .map(|(name, uri)| Artist::new(name, ResourceUri::from(uri), catalog.clone()));
            let album = block
                .album_resource
                .as_ref()
                .and_then(|r| r.identified())
                .map(|(name, uri)| Album::new(name, ResourceUri::from(uri), catalog.clone()));

            Some(Track::from_status(
                name,
                ResourceUri::from(uri),
                length_unit.to_duration(block.length),
                artist,
                album,
                catalog.clone(),
            ))
        });

        Self {
            track,
            playing: status.playing,
            shuffle: status.shuffle,
            repeat: status.repeat,
            play_enabled: status.play_enabled,
            prev_enabled: status.prev_enabled,
            next_enabled: status.next_enabled,
            position: status.playing_position,
            volume: status.volume,
            online: status.online,
            running: status.running,
            version: status.version,
            client_version: status.client_version,
            server_time: status.server_time,
        }
    }

    /// Events leading from `previous` to `self`, in a fixed order: track,
    /// volume, play state, playing time.
    ///
    /// A cycle reporting no track emits no track event.
    pub fn changes_since(&self, previous: &PlayerState) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if let Some(track) = &self.track {
            let previous_uri = previous.track.as_ref().map(|t| t.uri());
            if previous_uri != Some(track.uri()) {
                events.push(PlayerEvent::TrackChanged {
                    previous_uri: previous_uri.map(|uri| uri.to_string()),
                    uri: track.uri().to_string(),
                    name: track.name().to_string(),
                });
            }
        }

        if self.volume != previous.volume {
            events.push(PlayerEvent::VolumeChanged {
                previous: previous.volume,
                volume: self.volume,
            });
        }

        if self.playing != previous.playing {
            events.push(PlayerEvent::PlayStateChanged {
                playing: self.playing,
            });
        }

        if self.position != previous.position {
            events.push(PlayerEvent::PlayingTimeChanged {
                previous: previous.position,
                position: self.position,
            });
        }

        events
    }
}

/// `Player(PlayingTime: m:ss, CurrentTrack: ...)`
impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = format_minutes(
            Duration::try_from_secs_f64(self.position).unwrap_or_default(),
        );
        match &self.track {
            Some(track) => write!(f, "Player(PlayingTime: {}, CurrentTrack: {})", position, track),
            None => write!(f, "Player(PlayingTime: {}, CurrentTrack: none)", position),
        }
    }
}

/// Settled view of the poller, replaced atomically at the end of each cycle.
#[derive(Debug, Clone, Default)]
pub struct PlayerSnapshot {
    pub availability: Availability,
    pub state: PlayerState,
}

impl fmt::Display for PlayerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.state.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{StatusResource, StatusTrack};
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpRequest, HttpResponse};
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn catalog() -> Arc<CatalogClient> {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);
        Arc::new(CatalogClient::new(Arc::new(http), "https://api.spotify.com"))
    }

    fn resource(name: &str, uri: &str) -> Option<StatusResource> {
        Some(StatusResource {
            name: Some(name.to_string()),
            uri: Some(uri.to_string()),
        })
    }

    fn status(uri: &str, length: u64) -> StatusResponse {
        StatusResponse {
            running: true,
            playing: true,
            playing_position: 65.4,
            volume: 0.5,
            online: true,
            track: Some(StatusTrack {
                track_resource: resource("Airbag", uri),
                artist_resource: resource("Radiohead", "spotify:artist:a"),
                album_resource: resource("OK Computer", "spotify:album:b"),
                length,
                track_type: Some("normal".to_string()),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_length_in_seconds() {
        let state = PlayerState::from_status(
            status("spotify:track:1", 284),
            &PlayerState::default(),
            &catalog(),
            LengthUnit::Seconds,
        );
        let track = state.track.unwrap();
        assert_eq!(track.duration().await.unwrap(), Duration::from_secs(284));
    }

    #[tokio::test]
    async fn test_length_in_milliseconds() {
        let state = PlayerState::from_status(
            status("spotify:track:1", 284_400),
            &PlayerState::default(),
            &catalog(),
            LengthUnit::Milliseconds,
        );
        let track = state.track.unwrap();
        assert_eq!(track.duration().await.unwrap(), Duration::from_millis(284_400));
    }

    #[test]
    fn test_first_state_against_defaults() {
        let state = PlayerState::from_status(
            status("spotify:track:1", 284),
            &PlayerState::default(),
            &catalog(),
            LengthUnit::Seconds,
        );
        let events = state.changes_since(&PlayerState::default());

        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            PlayerEvent::TrackChanged { previous_uri: None, uri, name }
                if uri == "spotify:track:1" && name == "Airbag"
        ));
        assert!(matches!(events[1], PlayerEvent::VolumeChanged { volume, .. } if volume == 0.5));
        assert_eq!(events[2], PlayerEvent::PlayStateChanged { playing: true });
        assert!(matches!(events[3], PlayerEvent::PlayingTimeChanged { .. }));
    }

    #[test]
    fn test_same_uri_keeps_track_instance() {
        let client = catalog();
        let first = PlayerState::from_status(
            status("spotify:track:1", 284),
            &PlayerState::default(),
            &client,
            LengthUnit::Seconds,
        );
        let mut next_status = status("spotify:track:1", 284);
        next_status.volume = 0.25;
        let second = PlayerState::from_status(next_status, &first, &client, LengthUnit::Seconds);

        assert_eq!(
            second.changes_since(&first),
            vec![PlayerEvent::VolumeChanged {
                previous: 0.5,
                volume: 0.25
            }]
        );
    }

    #[test]
    fn test_trackless_status_emits_no_track_event() {
        let client = catalog();
        let first = PlayerState::from_status(
            status("spotify:track:1", 284),
            &PlayerState::default(),
            &client,
            LengthUnit::Seconds,
        );
        let mut idle = status("spotify:track:1", 284);
        idle.track = None;
        let second = PlayerState::from_status(idle, &first, &client, LengthUnit::Seconds);

        assert!(second.track.is_none());
        assert!(second.changes_since(&first).is_empty());
    }

    #[test]
    fn test_display() {
        let state = PlayerState::from_status(
            status("spotify:track:1", 284),
            &PlayerState::default(),
            &catalog(),
            LengthUnit::Seconds,
        );
        assert_eq!(
            state.to_string(),
            "Player(PlayingTime: 1:05, CurrentTrack: Radiohead - Airbag (OK Computer) (4:44))"
        );
        assert_eq!(
            PlayerState::default().to_string(),
            "Player(PlayingTime: 0:00, CurrentTrack: none)"
        );
    }
}
