//! Catalog HTTP client.

use std::sync::Arc;

use bridge_traits::{HttpClient, HttpRequest};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::models::{Resource, TrackPageResource};
use crate::uri::ResourceUri;

/// Fetches full resources and track pages from the remote catalog.
///
/// Every entity created through this client shares it, so one instance
/// serves a whole session.
pub struct CatalogClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    access_token: Option<String>,
}

impl CatalogClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Send `Authorization: Bearer {token}` with every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// `{base}/v1/{type}s/{id}`
    pub fn resource_url(&self, uri: &ResourceUri) -> Result<String> {
        let kind = uri
            .kind()
            .ok_or_else(|| CatalogError::InvalidUri(uri.to_string()))?;
        Ok(format!("{}/v1/{}s/{}", self.base_url, kind, uri.id()))
    }

    /// Fetch the full representation of `uri`.
    pub async fn fetch_resource<R: Resource>(&self, uri: &ResourceUri) -> Result<R> {
        if uri.kind() != Some(R::KIND) {
            return Err(CatalogError::InvalidUri(format!(
                "{} is not a {} URI",
                uri,
                R::KIND
            )));
        }

        let url = self.resource_url(uri)?;
        debug!(uri = %uri, url = %url, "Resolving full resource");
        self.get_json(&url, R::KIND).await
    }

    /// Fetch a track page by its `next` / `previous` link.
    pub async fn fetch_page(&self, url: &str) -> Result<TrackPageResource> {
        debug!(url = %url, "Fetching track page");
        self.get_json(url, "track page").await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &'static str) -> Result<T> {
        let mut request = HttpRequest::get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_token(token.clone());
        }

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Catalog request failed");
            return Err(CatalogError::Http {
                url: url.to_string(),
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| CatalogError::Decode {
            what,
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumResource, TrackResource};
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{BridgeError, HttpResponse};
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    #[test]
    fn test_resource_url() {
        let client = CatalogClient::new(Arc::new(MockHttpClient::new()), "https://api.spotify.com/");
        let url = client
            .resource_url(&ResourceUri::from("spotify:album:6dVIqQ8qmQ5GBnJ9shOYGE"))
            .unwrap();
        assert_eq!(url, "https://api.spotify.com/v1/albums/6dVIqQ8qmQ5GBnJ9shOYGE");

        let err = client.resource_url(&ResourceUri::from("garbage")).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_fetch_resource_decodes() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| {
                request.url == "https://api.spotify.com/v1/tracks/1"
                    && request.headers.get("Authorization").map(String::as_str)
                        == Some("Bearer BQD")
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"name":"Airbag","uri":"spotify:track:1","duration_ms":284400}"#,
                ))
            });

        let client = CatalogClient::new(Arc::new(http), "https://api.spotify.com")
            .with_access_token("BQD");
        let track: TrackResource = client
            .fetch_resource(&ResourceUri::from("spotify:track:1"))
            .await
            .unwrap();

        assert_eq!(track.duration_ms, Some(284_400));
    }

    #[tokio::test]
    async fn test_fetch_resource_rejects_kind_mismatch() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);

        let client = CatalogClient::new(Arc::new(http), "https://api.spotify.com");
        let err = client
            .fetch_resource::<AlbumResource>(&ResourceUri::from("spotify:track:1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_non_success_is_http_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(404, "{\"error\":\"not found\"}")));

        let client = CatalogClient::new(Arc::new(http), "https://api.spotify.com");
        let err = client.fetch_page("https://api.spotify.com/v1/albums/x/tracks?offset=50").await.unwrap_err();

        assert!(matches!(err, CatalogError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("Request timed out".to_string())));

        let client = CatalogClient::new(Arc::new(http), "https://api.spotify.com");
        let err = client
            .fetch_resource::<TrackResource>(&ResourceUri::from("spotify:track:1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{\"duration_ms\":\"long\"}")));

        let client = CatalogClient::new(Arc::new(http), "https://api.spotify.com");
        let err = client
            .fetch_resource::<TrackResource>(&ResourceUri::from("spotify:track:1"))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Decode { what: "track", .. }));
    }
}
