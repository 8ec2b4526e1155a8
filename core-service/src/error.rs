use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),

    #[error("Player error: {0}")]
    Player(#[from] core_player::PlayerError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
