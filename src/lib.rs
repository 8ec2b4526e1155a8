//! Workspace facade crate.
//!
//! Re-exports [`core_service`] behind the `desktop-shims` feature so host
//! applications can depend on `spotify-local-workspace` and get a fully wired
//! core without listing each crate.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
