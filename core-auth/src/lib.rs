//! # Session Authorization
//!
//! Acquires the tokens the player's local helper service requires and builds
//! the queries that carry them.
//!
//! ## Overview
//!
//! The helper only answers status queries that carry two tokens:
//!
//! - a CSRF token, issued by the helper itself at `simplecsrf/token.json`
//! - an OAuth bearer token, issued by a public token endpoint
//!
//! [`TokenSource::acquire`] fetches both concurrently. How the tokens are
//! obtained is opaque to the poller; tests substitute their own source.
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::{LocalTokenSource, LocalQuery, TokenSource};
//!
//! let source = LocalTokenSource::new(http_client, clock.clone(), endpoints.clone());
//! let tokens = source.acquire().await?;
//! let url = LocalQuery::new("remote/status.json", clock.unix_timestamp())
//!     .authorized(&tokens)
//!     .url(&endpoints.local_base_url);
//! ```

pub mod error;
pub mod local;
pub mod source;
pub mod types;

pub use error::{AuthError, Result};
pub use local::{strip_escaped_newlines, LocalQuery};
pub use source::{LocalTokenSource, TokenSource};
pub use types::{LocalServiceError, SessionTokens};
