use std::fmt;
use std::sync::Arc;

use crate::artist::Artist;
use crate::client::CatalogClient;
use crate::error::Result;
use crate::models::{AlbumResource, ArtistResource, ImageResource, TrackPageResource};
use crate::pagination::TrackList;
use crate::resolver::{Field, Resolver};
use crate::uri::ResourceUri;

const GENRES: Field<AlbumResource, Vec<String>> =
    Field::new("genres", |a: &AlbumResource| a.genres.clone());
const IMAGES: Field<AlbumResource, Vec<ImageResource>> =
    Field::new("images", |a: &AlbumResource| a.images.clone());
const RELEASE_DATE: Field<AlbumResource, String> =
    Field::new("release_date", |a: &AlbumResource| a.release_date.clone());
const RELEASE_DATE_PRECISION: Field<AlbumResource, String> = Field::new(
    "release_date_precision",
    |a: &AlbumResource| a.release_date_precision.clone(),
);
const ARTISTS: Field<AlbumResource, Vec<ArtistResource>> =
    Field::new("artists", |a: &AlbumResource| a.artists.clone());
const TRACKS: Field<AlbumResource, TrackPageResource> =
    Field::new("tracks", |a: &AlbumResource| a.tracks.clone());

/// A catalog album. Clones share the same resolver.
#[derive(Clone, Debug)]
pub struct Album {
    resolver: Arc<Resolver<AlbumResource>>,
}

impl Album {
    pub fn new(name: impl Into<String>, uri: ResourceUri, client: Arc<CatalogClient>) -> Self {
        Self {
            resolver: Arc::new(Resolver::new(name, uri, client)),
        }
    }

    pub fn from_partial(partial: AlbumResource, client: Arc<CatalogClient>) -> Result<Self> {
        Ok(Self {
            resolver: Arc::new(Resolver::from_partial(partial, client)?),
        })
    }

    pub fn uri(&self) -> &ResourceUri {
        self.resolver.uri()
    }

    pub fn name(&self) -> &str {
        self.resolver.name()
    }

    pub fn open_url(&self) -> Option<String> {
        self.uri().open_url()
    }

    pub(crate) fn client(&self) -> &Arc<CatalogClient> {
        self.resolver.client()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolver.is_resolved()
    }

    pub async fn genres(&self) -> Result<Vec<String>> {
        self.resolver.get(&GENRES).await
    }

    pub async fn images(&self) -> Result<Vec<ImageResource>> {
        self.resolver.get(&IMAGES).await
    }

    /// e.g. `1997-05-21`, `1997-05` or `1997`; see [`Album::release_date_precision`].
    pub async fn release_date(&self) -> Result<String> {
        self.resolver.get(&RELEASE_DATE).await
    }

    pub async fn release_date_precision(&self) -> Result<String> {
        self.resolver.get(&RELEASE_DATE_PRECISION).await
    }

    pub async fn artists(&self) -> Result<Vec<Artist>> {
        self.resolver
            .get(&ARTISTS)
            .await?
            .into_iter()
            .map(|artist| Artist::from_partial(artist, self.client().clone()))
            .collect()
    }

    /// The album's track listing, seeded from the first page embedded in the
    /// full resource.
    ///
    /// Each call builds a fresh list with its own page cache.
    pub async fn tracks(&self) -> Result<TrackList> {
        let first_page = self.resolver.get(&TRACKS).await?;
        TrackList::new(first_page, self.clone()).await
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
