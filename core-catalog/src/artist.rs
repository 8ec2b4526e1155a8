use std::fmt;
use std::sync::Arc;

use crate::client::CatalogClient;
use crate::error::Result;
use crate::models::{ArtistResource, ImageResource};
use crate::resolver::{Field, Resolver};
use crate::uri::ResourceUri;

const GENRES: Field<ArtistResource, Vec<String>> =
    Field::new("genres", |a: &ArtistResource| a.genres.clone());
const IMAGES: Field<ArtistResource, Vec<ImageResource>> =
    Field::new("images", |a: &ArtistResource| a.images.clone());

/// A catalog artist. Clones share the same resolver.
#[derive(Clone, Debug)]
pub struct Artist {
    resolver: Arc<Resolver<ArtistResource>>,
}

impl Artist {
    pub fn new(name: impl Into<String>, uri: ResourceUri, client: Arc<CatalogClient>) -> Self {
        Self {
            resolver: Arc::new(Resolver::new(name, uri, client)),
        }
    }

    pub fn from_partial(partial: ArtistResource, client: Arc<CatalogClient>) -> Result<Self> {
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

    pub async fn genres(&self) -> Result<Vec<String>> {
        self.resolver.get(&GENRES).await
    }

    pub async fn images(&self) -> Result<Vec<ImageResource>> {
        self.resolver.get(&IMAGES).await
    }

    pub fn is_resolved(&self) -> bool {
        self.resolver.is_resolved()
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
