use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use crate::album::Album;
use crate::artist::Artist;
use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::models::{AlbumResource, ArtistResource, ImageResource, TrackResource};
use crate::resolver::{Field, Resolver};
use crate::uri::ResourceUri;

const DURATION: Field<TrackResource, Duration> = Field::new("duration_ms", |t: &TrackResource| {
    t.duration_ms.map(Duration::from_millis)
});
const ARTISTS: Field<TrackResource, Vec<ArtistResource>> =
    Field::new("artists", |t: &TrackResource| t.artists.clone());
const ALBUM: Field<TrackResource, AlbumResource> =
    Field::new("album", |t: &TrackResource| t.album.as_deref().cloned());
const ALBUM_IMAGES: Field<TrackResource, Vec<ImageResource>> =
    Field::new("album.images", |t: &TrackResource| {
        t.album.as_ref().and_then(|album| album.images.clone())
    });

/// A catalog track.
///
/// Two tracks are equal when their URIs are equal; names and cached fields do
/// not take part in comparison or hashing. Clones share the same resolver.
#[derive(Clone, Debug)]
pub struct Track {
    inner: Arc<TrackInner>,
}

#[derive(Debug)]
struct TrackInner {
    resolver: Resolver<TrackResource>,
    artist: Option<Artist>,
    album: Option<Album>,
    length: Option<Duration>,
}

impl Track {
    /// Stub from name and URI; every field resolves the full track.
    pub fn new(name: impl Into<String>, uri: ResourceUri, client: Arc<CatalogClient>) -> Self {
        Self::with_parts(Resolver::new(name, uri, client), None, None, None)
    }

    /// Track built from a partial snapshot, e.g. an item of an album page.
    pub fn from_partial(partial: TrackResource, client: Arc<CatalogClient>) -> Result<Self> {
        Ok(Self::with_parts(
            Resolver::from_partial(partial, client)?,
            None,
            None,
            None,
        ))
    }

    /// Track listed on `album`'s pages; answers [`Track::album`] without I/O.
    pub fn from_partial_in_album(partial: TrackResource, album: &Album) -> Result<Self> {
        Ok(Self::with_parts(
            Resolver::from_partial(partial, album.client().clone())?,
            None,
            Some(album.clone()),
            None,
        ))
    }

    /// Track reported by the player, with its embedded artist and album and
    /// the length already converted by the caller.
    pub fn from_status(
        name: impl Into<String>,
        uri: ResourceUri,
        length: Duration,
        artist: Option<Artist>,
        album: Option<Album>,
        client: Arc<CatalogClient>,
    ) -> Self {
        Self::with_parts(Resolver::new(name, uri, client), artist, album, Some(length))
    }

    fn with_parts(
        resolver: Resolver<TrackResource>,
        artist: Option<Artist>,
        album: Option<Album>,
        length: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                resolver,
                artist,
                album,
                length,
            }),
        }
    }

    pub fn uri(&self) -> &ResourceUri {
        self.inner.resolver.uri()
    }

    pub fn name(&self) -> &str {
        self.inner.resolver.name()
    }

    pub fn open_url(&self) -> Option<String> {
        self.uri().open_url()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.resolver.is_resolved()
    }

    pub async fn duration(&self) -> Result<Duration> {
        if let Some(length) = self.inner.length {
            return Ok(length);
        }
        self.inner.resolver.get(&DURATION).await
    }

    pub async fn artists(&self) -> Result<Vec<Artist>> {
        let client = self.inner.resolver.client();
        self.inner
            .resolver
            .get(&ARTISTS)
            .await?
            .into_iter()
            .map(|artist| Artist::from_partial(artist, client.clone()))
            .collect()
    }

    /// The artist given at construction, otherwise the first listed one.
    pub async fn artist(&self) -> Result<Artist> {
        if let Some(artist) = &self.inner.artist {
            return Ok(artist.clone());
        }

        self.artists()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound {
                entity: "track",
                uri: self.uri().to_string(),
                field: "artists",
            })
    }

    pub async fn album(&self) -> Result<Album> {
        if let Some(album) = &self.inner.album {
            return Ok(album.clone());
        }

        let partial = self.inner.resolver.get(&ALBUM).await?;
        Album::from_partial(partial, self.inner.resolver.client().clone())
    }

    /// Cover art, read from the track's album object when it carries images,
    /// otherwise from the album itself.
    pub async fn album_images(&self) -> Result<Vec<ImageResource>> {
        if self.inner.album.is_none() {
            match self.inner.resolver.get(&ALBUM_IMAGES).await {
                Err(CatalogError::NotFound { .. }) => {}
                other => return other,
            }
        }

        self.album().await?.images().await
    }

    fn known_artist_name(&self) -> Option<String> {
        if let Some(artist) = &self.inner.artist {
            return Some(artist.name().to_string());
        }
        self.inner
            .resolver
            .peek(&ARTISTS)
            .and_then(|artists| artists.into_iter().next())
            .and_then(|artist| artist.name)
    }

    fn known_album_name(&self) -> Option<String> {
        if let Some(album) = &self.inner.album {
            return Some(album.name().to_string());
        }
        self.inner.resolver.peek(&ALBUM).and_then(|album| album.name)
    }

    fn known_length(&self) -> Option<Duration> {
        self.inner
            .length
            .or_else(|| self.inner.resolver.peek(&DURATION))
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.uri() == other.uri()
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri().hash(state);
    }
}

/// `m:ss`
pub fn format_minutes(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `Artist - Name (Album) (m:ss)`, built from what is already known locally.
impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artist = self
            .known_artist_name()
            .unwrap_or_else(|| "Unknown Artist".to_string());
        let album = self
            .known_album_name()
            .unwrap_or_else(|| "Unknown Album".to_string());
        let length = self
            .known_length()
            .map(format_minutes)
            .unwrap_or_else(|| "-:--".to_string());

        write!(f, "{} - {} ({}) ({})", artist, self.name(), album, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{HttpClient, HttpRequest, HttpResponse};
    use mockall::mock;
    use std::collections::hash_map::DefaultHasher;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn offline() -> Arc<CatalogClient> {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);
        Arc::new(CatalogClient::new(Arc::new(http), "https://api.spotify.com"))
    }

    fn hash_of(track: &Track) -> u64 {
        let mut hasher = DefaultHasher::new();
        track.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_ignores_name() {
        let client = offline();
        let a = Track::new("Airbag", ResourceUri::from("spotify:track:1"), client.clone());
        let b = Track::new("Airbag (Remastered)", ResourceUri::from("spotify:track:1"), client.clone());
        let c = Track::new("Airbag", ResourceUri::from("spotify:track:2"), client);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_status_track_answers_locally() {
        let client = offline();
        let artist = Artist::new("Radiohead", ResourceUri::from("spotify:artist:a"), client.clone());
        let album = Album::new("OK Computer", ResourceUri::from("spotify:album:b"), client.clone());
        let track = Track::from_status(
            "Airbag",
            ResourceUri::from("spotify:track:1"),
            Duration::from_secs(284),
            Some(artist),
            Some(album),
            client,
        );

        assert_eq!(track.duration().await.unwrap(), Duration::from_secs(284));
        assert_eq!(track.artist().await.unwrap().name(), "Radiohead");
        assert_eq!(track.album().await.unwrap().name(), "OK Computer");
        assert_eq!(track.to_string(), "Radiohead - Airbag (OK Computer) (4:44)");
        assert!(!track.is_resolved());
    }

    #[tokio::test]
    async fn test_first_listed_artist_is_primary() {
        let partial: TrackResource = serde_json::from_str(
            r#"{
                "name": "Daydreaming",
                "uri": "spotify:track:2",
                "duration_ms": 384000,
                "artists": [
                    {"name": "Radiohead", "uri": "spotify:artist:a"},
                    {"name": "Jonny Greenwood", "uri": "spotify:artist:j"}
                ]
            }"#,
        )
        .unwrap();
        let track = Track::from_partial(partial, offline()).unwrap();

        assert_eq!(track.artist().await.unwrap().name(), "Radiohead");
        assert_eq!(track.artists().await.unwrap().len(), 2);
        assert_eq!(track.duration().await.unwrap(), Duration::from_millis(384_000));
        assert_eq!(track.to_string(), "Radiohead - Daydreaming (Unknown Album) (6:24)");
    }

    #[tokio::test]
    async fn test_album_images_from_embedded_album() {
        let partial: TrackResource = serde_json::from_str(
            r#"{
                "name": "Airbag",
                "uri": "spotify:track:1",
                "album": {
                    "name": "OK Computer",
                    "uri": "spotify:album:b",
                    "images": [{"url": "https://i.scdn.co/image/a", "width": 300, "height": 300}]
                }
            }"#,
        )
        .unwrap();
        let track = Track::from_partial(partial, offline()).unwrap();

        let images = track.album_images().await.unwrap();
        assert_eq!(images[0].url, "https://i.scdn.co/image/a");
        assert_eq!(track.album().await.unwrap().name(), "OK Computer");
    }

    #[tokio::test]
    async fn test_missing_artists_is_not_found() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"name":"Untitled","uri":"spotify:track:9","artists":[]}"#)));
        let client = Arc::new(CatalogClient::new(Arc::new(http), "https://api.spotify.com"));

        let track = Track::new("Untitled", ResourceUri::from("spotify:track:9"), client);
        let err = track.artist().await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { field: "artists", .. }));
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(Duration::from_secs(0)), "0:00");
        assert_eq!(format_minutes(Duration::from_secs(61)), "1:01");
        assert_eq!(format_minutes(Duration::from_millis(599_999)), "9:59");
    }
}
