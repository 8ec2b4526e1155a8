//! Session token acquisition.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::{Clock, HttpClient, HttpRequest, HttpResponse};
use core_runtime::config::EndpointConfig;
use core_runtime::logging::redact_if_sensitive;
use tracing::{debug, instrument, warn};

use crate::error::{AuthError, Result};
use crate::local::{strip_escaped_newlines, LocalQuery};
use crate::types::{CsrfResponse, OAuthResponse, SessionTokens};

const CSRF_ENDPOINT: &str = "simplecsrf/token.json";

/// Source of the two tokens the local service requires.
///
/// `acquire` issues both fetches concurrently and fails if either fails.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a CSRF token from the local service.
    async fn csrf_token(&self) -> Result<String>;

    /// Fetch an OAuth bearer token.
    async fn oauth_token(&self) -> Result<String>;

    /// Fetch both tokens concurrently.
    async fn acquire(&self) -> Result<SessionTokens> {
        let (csrf, oauth) = futures::try_join!(self.csrf_token(), self.oauth_token())?;
        Ok(SessionTokens { csrf, oauth })
    }
}

/// Token source backed by the local helper service and the public token
/// endpoint.
pub struct LocalTokenSource {
    http_client: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    endpoints: EndpointConfig,
}

impl LocalTokenSource {
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

    async fn fetch(&self, request: HttpRequest, what: &'static str) -> Result<String> {
        let url = request.url.clone();
        let response: HttpResponse = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Token request failed");
            return Err(AuthError::Http {
                url,
                status: response.status,
            });
        }

        String::from_utf8(response.body.to_vec()).map_err(|e| AuthError::Decode {
            what,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TokenSource for LocalTokenSource {
    #[instrument(skip(self))]
    async fn csrf_token(&self) -> Result<String> {
        let request = LocalQuery::new(CSRF_ENDPOINT, self.clock.unix_timestamp())
            .request(&self.endpoints.local_base_url, &self.endpoints.origin);

        let body = self.fetch(request, "CSRF response").await?;
        // The CSRF body is escaped more aggressively than the others.
        let body = strip_escaped_newlines(&body).replace('\\', "");

        let decoded: CsrfResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Decode {
                what: "CSRF response",
                message: e.to_string(),
            })?;

        if let Some(error) = decoded.error {
            warn!(kind = %error.kind, message = %error.message, "Local service rejected CSRF request");
            return Err(AuthError::Rejected {
                kind: error.kind,
                message: error.message,
            });
        }

        let token = decoded
            .token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken("CSRF"))?;

        debug!(csrf = %redact_if_sensitive("csrf", &token), "Acquired CSRF token");
        Ok(token)
    }

    #[instrument(skip(self))]
    async fn oauth_token(&self) -> Result<String> {
        let request = HttpRequest::get(self.endpoints.oauth_token_url.clone());
        let body = self.fetch(request, "OAuth response").await?;

        let decoded: OAuthResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Decode {
                what: "OAuth response",
                message: e.to_string(),
            })?;

        let token = decoded
            .token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken("OAuth"))?;

        debug!(oauth = %redact_if_sensitive("oauth", &token), "Acquired OAuth token");
        Ok(token)
    }
}
