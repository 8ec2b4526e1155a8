use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Token acquisition failed: {0}")]
    Token(#[from] AuthError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] BridgeError),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("Local service error {kind}: {message}")]
    Remote { kind: String, message: String },

    #[error("Poll interval of {requested_ms}ms is below the minimum of {minimum_ms}ms")]
    InvalidInterval { requested_ms: u128, minimum_ms: u128 },

    #[error("Player launch failed: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
