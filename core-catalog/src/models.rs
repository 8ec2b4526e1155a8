//! Wire representations of catalog resources.
//!
//! The same types describe both a full resource fetched from
//! `/v1/{type}s/{id}` and the partial copies embedded in other responses, so
//! every field is optional. `None` means "not present in this payload", never
//! a zero value.

use serde::{Deserialize, Serialize};

/// Cover art or artist picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResource {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistResource {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<ImageResource>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumResource {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<ArtistResource>>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<ImageResource>>,
    /// First page of the album's track listing.
    #[serde(default)]
    pub tracks: Option<TrackPageResource>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// `year`, `month` or `day`.
    #[serde(default)]
    pub release_date_precision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackResource {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub album: Option<Box<AlbumResource>>,
    #[serde(default)]
    pub artists: Option<Vec<ArtistResource>>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// One page of an album's track listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPageResource {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub items: Vec<TrackResource>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
}

/// A resource type addressable at `/v1/{KIND}s/{id}`.
pub trait Resource: serde::de::DeserializeOwned + Send + Sync + 'static {
    /// Path segment and URI type (`track`, `album`, `artist`).
    const KIND: &'static str;

    fn uri(&self) -> Option<&str>;

    fn name(&self) -> Option<&str>;
}

impl Resource for TrackResource {
    const KIND: &'static str = "track";

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Resource for AlbumResource {
    const KIND: &'static str = "album";

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Resource for ArtistResource {
    const KIND: &'static str = "artist";

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_track_keeps_absent_fields_absent() {
        let json = r#"{
            "name": "Airbag",
            "uri": "spotify:track:6DXLO8LndZMVOHM0wNbpzg",
            "artists": [{"name": "Radiohead", "uri": "spotify:artist:4Z8W4fKeB5YxbusRsdQVPb"}]
        }"#;
        let track: TrackResource = serde_json::from_str(json).unwrap();

        assert_eq!(track.name(), Some("Airbag"));
        assert!(track.duration_ms.is_none());
        assert!(track.album.is_none());
        assert_eq!(track.artists.unwrap()[0].name.as_deref(), Some("Radiohead"));
    }

    #[test]
    fn test_album_with_embedded_page() {
        let json = r#"{
            "name": "OK Computer",
            "type": "album",
            "uri": "spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE",
            "genres": [],
            "images": [{"url": "https://i.scdn.co/image/a", "width": 640, "height": 640}],
            "release_date": "1997-05-21",
            "release_date_precision": "day",
            "tracks": {
                "items": [{"name": "Airbag", "uri": "spotify:track:1", "duration_ms": 284400}],
                "limit": 50, "offset": 0, "total": 12,
                "next": null, "previous": null
            }
        }"#;
        let album: AlbumResource = serde_json::from_str(json).unwrap();

        assert_eq!(album.kind.as_deref(), Some("album"));
        assert_eq!(album.genres, Some(vec![]));
        assert_eq!(album.images.as_ref().unwrap()[0].width, Some(640));
        let page = album.tracks.unwrap();
        assert_eq!(page.total, Some(12));
        assert_eq!(page.items[0].duration_ms, Some(284_400));
        assert!(page.next.is_none());
    }

    #[test]
    fn test_resource_kinds() {
        assert_eq!(TrackResource::KIND, "track");
        assert_eq!(AlbumResource::KIND, "album");
        assert_eq!(ArtistResource::KIND, "artist");
    }
}
