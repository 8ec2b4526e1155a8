use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("Local service rejected the request ({kind}): {message}")]
    Rejected { kind: String, message: String },

    #[error("Token missing from {0} response")]
    MissingToken(&'static str),
}

pub type Result<T> = std::result::Result<T, AuthError>;
