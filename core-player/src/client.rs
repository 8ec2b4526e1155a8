//! Status queries against the helper's local service.

use std::sync::Arc;

use bridge_traits::{Clock, HttpClient};
use core_auth::{strip_escaped_newlines, LocalQuery, SessionTokens};
use core_runtime::config::EndpointConfig;
use tracing::{debug, warn};

use crate::error::{PlayerError, Result};
use crate::status::StatusResponse;

const STATUS_ENDPOINT: &str = "remote/status.json";

pub struct LocalPlayerClient {
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    endpoints: EndpointConfig,
}

impl LocalPlayerClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
        endpoints: EndpointConfig,
    ) -> Self {
        Self {
            http_client,
            clock,
            endpoints,
        }
    }

    /// Fetch `remote/status.json` with both session tokens.
    pub async fn status(&self, tokens: &SessionTokens) -> Result<StatusResponse> {
        let request = LocalQuery::new(STATUS_ENDPOINT, self.clock.unix_timestamp())
            .authorized(tokens)
            .request(&self.endpoints.local_base_url, &self.endpoints.origin);
        let url = request.url.clone();

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "Status request failed");
            return Err(PlayerError::Http {
                url: redact_query(&url),
                status: response.status,
            });
        }

        let body = std::str::from_utf8(&response.body).map_err(|e| PlayerError::Decode {
            what: "status response",
            message: e.to_string(),
        })?;
        let body = strip_escaped_newlines(body);
        if body.trim().is_empty() {
            return Err(PlayerError::Decode {
                what: "status response",
                message: "empty body".to_string(),
            });
        }

        let status: StatusResponse =
            serde_json::from_str(&body).map_err(|e| PlayerError::Decode {
                what: "status response",
                message: e.to_string(),
            })?;

        if let Some(error) = status.error {
            warn!(kind = %error.kind, message = %error.message, "Local service rejected status request");
            return Err(PlayerError::Remote {
                kind: error.kind,
                message: error.message,
            });
        }

        debug!(
            playing = status.playing,
            position = status.playing_position,
            volume = status.volume,
            "Fetched player status"
        );
        Ok(status)
    }
}

/// Status URLs carry both tokens; errors only keep the path.
fn redact_query(url: &str) -> String {
    url.split('?').next().unwrap_or_default().to_string()
}
