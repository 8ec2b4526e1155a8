//! Default install locations.

use std::path::PathBuf;

#[cfg(windows)]
const HELPER_BINARY: &str = "SpotifyWebHelper.exe";
#[cfg(not(windows))]
const HELPER_BINARY: &str = "SpotifyWebHelper";

#[cfg(windows)]
const PLAYER_BINARY: &str = "spotify.exe";
#[cfg(not(windows))]
const PLAYER_BINARY: &str = "spotify";

/// `<config dir>/Spotify/Data/SpotifyWebHelper(.exe)`
///
/// On Windows the config dir is the roaming `%APPDATA%`.
pub fn default_helper_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Spotify").join("Data").join(HELPER_BINARY))
}

/// `<config dir>/Spotify/spotify(.exe)`
pub fn default_player_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("Spotify").join(PLAYER_BINARY))
}
