use serde::Deserialize;
use std::fmt;

/// Tokens authorizing requests against the local helper service.
///
/// # Security
///
/// The `Debug` implementation redacts both values.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Cross-site request forgery token issued by the local service
    pub csrf: String,
    /// Bearer token issued by the remote token endpoint
    pub oauth: String,
}

impl SessionTokens {
    pub fn new(csrf: impl Into<String>, oauth: impl Into<String>) -> Self {
        Self {
            csrf: csrf.into(),
            oauth: oauth.into(),
        }
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("csrf", &"[REDACTED]")
            .field("oauth", &"[REDACTED]")
            .finish()
    }
}

/// Error object the local service embeds in otherwise successful responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalServiceError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Body of `simplecsrf/token.json`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CsrfResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<LocalServiceError>,
}

/// Body of the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OAuthResponse {
    #[serde(rename = "t", default)]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_tokens_debug_redacts() {
        let tokens = SessionTokens::new("f3a9c0", "NAowChgKB1Nwb3RpZnk");
        let debug_str = format!("{:?}", tokens);

        assert!(!debug_str.contains("f3a9c0"));
        assert!(!debug_str.contains("NAowChgKB1Nwb3RpZnk"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_csrf_response_with_error() {
        let json = r#"{"error":{"type":"4107","message":"Invalid origin"},"version":9,"running":true}"#;
        let response: CsrfResponse = serde_json::from_str(json).unwrap();

        assert!(response.token.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.kind, "4107");
        assert_eq!(error.message, "Invalid origin");
    }

    #[test]
    fn test_oauth_response() {
        let response: OAuthResponse = serde_json::from_str(r#"{"t":"NAowChgK"}"#).unwrap();
        assert_eq!(response.token.as_deref(), Some("NAowChgK"));
    }
}
