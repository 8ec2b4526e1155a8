//! Resource identifiers of the form `scheme:type:id`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base of the public web player links returned by [`ResourceUri::open_url`].
const OPEN_URL_BASE: &str = "http://open.spotify.com";

/// Opaque colon-separated resource identifier, e.g.
/// `spotify:track:63OQupATfueTdZMWTxW03A`.
///
/// Equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUri(String);

impl ResourceUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading segment (`spotify`).
    pub fn scheme(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// First segment after the scheme that differs from it (`track`).
    ///
    /// `None` when the URI has no such segment.
    pub fn kind(&self) -> Option<&str> {
        let scheme = self.scheme();
        self.0
            .split(':')
            .skip(1)
            .find(|segment| !segment.is_empty() && *segment != scheme)
    }

    /// Last segment (`63OQupATfueTdZMWTxW03A`).
    pub fn id(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or_default()
    }

    /// Web player link, e.g. `http://open.spotify.com/track/63OQupATfueTdZMWTxW03A`.
    pub fn open_url(&self) -> Option<String> {
        self.kind()
            .map(|kind| format!("{}/{}/{}", OPEN_URL_BASE, kind, self.id()))
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for ResourceUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}
