//! Process Inspection Abstraction
//!
//! Detects whether the player and its web helper are running, and launches
//! them when they are not.

use std::path::Path;

use crate::error::Result;

/// Inspects and launches local processes.
///
/// Names are matched against the process image name without extension, so
/// `"spotify"` matches both `spotify` and `spotify.exe`. Matching is
/// case-insensitive.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::process::ProcessInspector;
///
/// fn helper_missing(inspector: &dyn ProcessInspector) -> bool {
///     inspector.is_running("spotify") && !inspector.is_running("SpotifyWebHelper")
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ProcessInspector: Send + Sync {
    /// Whether at least one process with the given name is running.
    fn is_running(&self, name: &str) -> bool;

    /// Spawn the executable at `path` detached from the caller.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::LaunchFailed`](crate::error::BridgeError::LaunchFailed)
    /// when the executable is missing or cannot be started.
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Normalize a process image name for comparison.
pub fn normalize_process_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_process_name() {
        assert_eq!(normalize_process_name("Spotify.exe"), "spotify");
        assert_eq!(normalize_process_name("SpotifyWebHelper"), "spotifywebhelper");
        assert_eq!(normalize_process_name("spotify"), "spotify");
    }

    #[test]
    fn test_mock_inspector() {
        let mut inspector = MockProcessInspector::new();
        inspector
            .expect_is_running()
            .withf(|name| name == "spotify")
            .return_const(true);

        let inspector: &dyn ProcessInspector = &inspector;
        assert!(inspector.is_running("spotify"));
    }
}
