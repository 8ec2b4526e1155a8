use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Process launch failed for {path}: {message}")]
    LaunchFailed { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
