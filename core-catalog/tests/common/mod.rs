//! Shared fakes for catalog integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{BridgeError, HttpClient, HttpRequest, HttpResponse};
use core_catalog::CatalogClient;
use parking_lot::Mutex;

pub const CATALOG: &str = "https://api.spotify.com";

/// HTTP client answering from a fixed URL table and counting hits per URL.
#[derive(Default)]
pub struct RoutedHttp {
    routes: Mutex<HashMap<String, (u16, String)>>,
    failures: Mutex<HashMap<String, usize>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl RoutedHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: impl Into<String>, body: impl Into<String>) {
        self.routes.lock().insert(url.into(), (200, body.into()));
    }

    /// Fail the next `times` requests to `url` with a transport error.
    pub fn fail_next(&self, url: impl Into<String>, times: usize) {
        self.failures.lock().insert(url.into(), times);
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().get(url).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().values().sum()
    }

    pub fn catalog(self: &Arc<Self>) -> Arc<CatalogClient> {
        Arc::new(CatalogClient::new(self.clone(), CATALOG))
    }
}

#[async_trait]
impl HttpClient for RoutedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        *self.hits.lock().entry(request.url.clone()).or_insert(0) += 1;

        if let Some(remaining) = self.failures.lock().get_mut(&request.url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(BridgeError::OperationFailed("Connection reset".to_string()));
            }
        }

        match self.routes.lock().get(&request.url) {
            Some((status, body)) => Ok(HttpResponse::new(*status, body.clone())),
            None => Ok(HttpResponse::new(404, "{\"error\":{\"status\":404}}")),
        }
    }
}

/// URL of the track page of album `x` starting at `offset`.
pub fn page_url(offset: usize) -> String {
    format!("{}/v1/albums/x/tracks?offset={}&limit=2", CATALOG, offset)
}

/// JSON page of album `x` with two tracks per page and `total` tracks overall.
pub fn page_json(offset: usize, total: usize) -> String {
    let items: Vec<String> = (offset..(offset + 2).min(total))
        .map(|n| {
            format!(
                r#"{{"name":"Track {n}","uri":"spotify:track:t{n}","duration_ms":{ms}}}"#,
                n = n,
                ms = 180_000 + n * 1000
            )
        })
        .collect();

    let link = |target: Option<usize>| match target {
        Some(o) => format!("\"{}\"", page_url(o)),
        None => "null".to_string(),
    };
    let previous = offset.checked_sub(2);
    let next = Some(offset + 2).filter(|n| *n < total);

    format!(
        r#"{{"href":"{href}","items":[{items}],"limit":2,"offset":{offset},"total":{total},"previous":{previous},"next":{next}}}"#,
        href = page_url(offset),
        items = items.join(","),
        offset = offset,
        total = total,
        previous = link(previous),
        next = link(next),
    )
}
