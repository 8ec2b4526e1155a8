//! Body of the local service's `remote/status.json`.

use core_auth::LocalServiceError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    pub version: Option<u32>,
    pub client_version: Option<String>,
    pub running: bool,
    pub playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub play_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub track: Option<StatusTrack>,
    /// Seconds into the current track.
    pub playing_position: f64,
    pub server_time: Option<i64>,
    /// `[0.0, 1.0]`
    pub volume: f64,
    pub online: bool,
    pub error: Option<LocalServiceError>,
}

/// Track block of a status payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusTrack {
    pub track_resource: Option<StatusResource>,
    pub artist_resource: Option<StatusResource>,
    pub album_resource: Option<StatusResource>,
    /// Unit depends on the player build; see `LengthUnit`.
    pub length: u64,
    pub track_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusResource {
    pub name: Option<String>,
    pub uri: Option<String>,
}

impl StatusResource {
    /// `(name, uri)` when the resource carries a URI.
    pub fn identified(&self) -> Option<(&str, &str)> {
        let uri = self.uri.as_deref().filter(|uri| !uri.is_empty())?;
        Some((self.name.as_deref().unwrap_or_default(), uri))
    }
}
