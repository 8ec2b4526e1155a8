//! Query construction for the helper's local HTTP service.
//!
//! Every request carries the same fixed parameters:
//!
//! ```text
//! {base}/{endpoint}?ref=&cors=&_={unix seconds}[&oauth={token}][&csrf={token}]
//! ```
//!
//! and must send an `Origin` header the service whitelists.

use std::time::Duration;

use bridge_traits::http::HttpRequest;

use crate::types::SessionTokens;

/// The helper answers on loopback; anything slower is treated as a failed cycle.
pub const LOCAL_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// One request against the local service.
#[derive(Debug, Clone, Copy)]
pub struct LocalQuery<'a> {
    endpoint: &'a str,
    timestamp: i64,
    oauth: Option<&'a str>,
    csrf: Option<&'a str>,
}

impl<'a> LocalQuery<'a> {
    /// Query without authorization parameters.
    pub fn new(endpoint: &'a str, timestamp: i64) -> Self {
        Self {
            endpoint,
            timestamp,
            oauth: None,
            csrf: None,
        }
    }

    /// Attach both session tokens.
    pub fn authorized(mut self, tokens: &'a SessionTokens) -> Self {
        self.oauth = Some(&tokens.oauth);
        self.csrf = Some(&tokens.csrf);
        self
    }

    /// Render the full URL against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/{}?ref=&cors=&_={}",
            base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/'),
            self.timestamp
        );

        if let Some(oauth) = self.oauth {
            url.push_str("&oauth=");
            url.push_str(&urlencoding::encode(oauth));
        }
        if let Some(csrf) = self.csrf {
            url.push_str("&csrf=");
            url.push_str(&urlencoding::encode(csrf));
        }

        url
    }

    /// Build the HTTP request, including the `Origin` header.
    pub fn request(&self, base_url: &str, origin: &str) -> HttpRequest {
        HttpRequest::get(self.url(base_url))
            .header("Origin", origin)
            .timeout(LOCAL_REQUEST_TIMEOUT)
    }
}

/// Remove the literal `\n` escape sequences the service sprinkles into
/// string values.
pub fn strip_escaped_newlines(body: &str) -> String {
    body.replace("\\n", "")
}
