//! # Core Catalog
//!
//! Tracks, albums and artists of the remote catalog, resolved lazily.
//!
//! ## Overview
//!
//! Entities are usually built from partial snapshots embedded in other
//! responses (a player status, an album page). Reading a field the snapshot
//! carries is free; reading any other field fetches the entity's full resource
//! from `{catalog}/v1/{type}s/{id}` once and serves it from memory afterwards.
//!
//! An album's track listing is a [`TrackList`], which pages through the remote
//! collection on demand.
//!
//! ## Usage
//!
//! ```ignore
//! use core_catalog::{Album, CatalogClient, ResourceUri};
//!
//! let client = Arc::new(CatalogClient::new(http_client, "https://api.spotify.com"));
//! let album = Album::new("OK Computer", ResourceUri::from("spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE"), client);
//!
//! let year = album.release_date().await?;
//! let tracks = album.tracks().await?;
//! let opener = tracks.get(0).await?;
//! ```

pub mod album;
pub mod artist;
pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod resolver;
pub mod track;
pub mod uri;

pub use album::Album;
pub use artist::Artist;
pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use models::{
    AlbumResource, ArtistResource, ImageResource, Resource, TrackPageResource, TrackResource,
};
pub use pagination::{Page, TrackList};
pub use resolver::{Field, Resolver};
pub use track::{format_minutes, Track};
pub use uri::ResourceUri;
