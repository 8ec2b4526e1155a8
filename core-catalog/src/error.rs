use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] BridgeError),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("Index {index} out of range for list of {count} items")]
    OutOfRange { index: i64, count: usize },

    #[error("{entity} {uri} has no {field}")]
    NotFound {
        entity: &'static str,
        uri: String,
        field: &'static str,
    },

    #[error("Invalid resource URI: {0}")]
    InvalidUri(String),

    #[error("Broken page chain at offset {offset}: {reason}")]
    BrokenPageChain { offset: usize, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
