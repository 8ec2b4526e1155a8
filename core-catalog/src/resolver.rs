//! # Lazy Resource Resolution
//!
//! Every catalog entity is backed by a [`Resolver`]: an identifier, a display
//! name, an optional partial snapshot and a fetch-once slot for the full
//! resource.
//!
//! ## Field lookup
//!
//! Fields are described by [`Field`] constants, each pairing a name with an
//! accessor function. [`Resolver::get`] evaluates the accessor against the
//! partial snapshot first and only falls back to the full resource when the
//! snapshot does not carry the field. The full resource is fetched at most once
//! per resolver, regardless of how many absent fields are read afterwards.
//!
//! ## I/O
//!
//! [`Resolver::get`] and [`Resolver::full`] are the only places in the entity
//! API that touch the network. A failed fetch is returned to the caller and
//! leaves the slot empty, so a later access fetches again.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::client::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::models::Resource;
use crate::uri::ResourceUri;

/// A named, typed accessor into a resource.
///
/// The accessor returns `None` when the field is not present in the given
/// payload.
pub struct Field<R, T> {
    pub name: &'static str,
    pub read: fn(&R) -> Option<T>,
}

impl<R, T> Field<R, T> {
    pub const fn new(name: &'static str, read: fn(&R) -> Option<T>) -> Self {
        Self { name, read }
    }
}

impl<R, T> Clone for Field<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, T> Copy for Field<R, T> {}

/// Fetch-once view over a catalog resource.
pub struct Resolver<R: Resource> {
    uri: ResourceUri,
    name: String,
    partial: Option<R>,
    full: OnceCell<Arc<R>>,
    client: Arc<CatalogClient>,
}

impl<R: Resource> Resolver<R> {
    /// Stub without a snapshot; every field access resolves the full resource.
    pub fn new(name: impl Into<String>, uri: ResourceUri, client: Arc<CatalogClient>) -> Self {
        Self {
            uri,
            name: name.into(),
            partial: None,
            full: OnceCell::new(),
            client,
        }
    }

    /// Resolver seeded with a partial snapshot.
    ///
    /// The snapshot must carry a URI; a missing name becomes empty.
    pub fn from_partial(partial: R, client: Arc<CatalogClient>) -> Result<Self> {
        let uri = partial.uri().map(ResourceUri::from).ok_or(CatalogError::Decode {
            what: R::KIND,
            message: "partial snapshot has no uri".to_string(),
        })?;
        let name = partial.name().unwrap_or_default().to_string();

        Ok(Self {
            uri,
            name,
            partial: Some(partial),
            full: OnceCell::new(),
            client,
        })
    }

    pub fn uri(&self) -> &ResourceUri {
        &self.uri
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partial(&self) -> Option<&R> {
        self.partial.as_ref()
    }

    pub fn client(&self) -> &Arc<CatalogClient> {
        &self.client
    }

    /// Whether the full resource has been fetched.
    pub fn is_resolved(&self) -> bool {
        self.full.initialized()
    }

    /// Read a field without any I/O: snapshot first, then an already fetched
    /// full resource.
    pub fn peek<T>(&self, field: &Field<R, T>) -> Option<T> {
        self.partial
            .as_ref()
            .and_then(field.read)
            .or_else(|| self.full.get().and_then(|full| (field.read)(full)))
    }

    /// Read a field, resolving the full resource if the snapshot lacks it.
    pub async fn get<T>(&self, field: &Field<R, T>) -> Result<T> {
        if let Some(value) = self.partial.as_ref().and_then(field.read) {
            return Ok(value);
        }

        let full = self.full().await?;
        (field.read)(&full).ok_or_else(|| CatalogError::NotFound {
            entity: R::KIND,
            uri: self.uri.to_string(),
            field: field.name,
        })
    }

    /// The full resource, fetched on first call.
    pub async fn full(&self) -> Result<Arc<R>> {
        self.full
            .get_or_try_init(|| async {
                debug!(uri = %self.uri, kind = R::KIND, "Snapshot incomplete, fetching full resource");
                self.client.fetch_resource::<R>(&self.uri).await.map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }
}

impl<R: Resource> fmt::Debug for Resolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("kind", &R::KIND)
            .field("uri", &self.uri)
            .field("name", &self.name)
            .field("has_partial", &self.partial.is_some())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
