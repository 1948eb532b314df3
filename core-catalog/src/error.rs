use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Document store error: {0}")]
    Store(#[from] BridgeError),

    #[error("Invalid document {id}: {message}")]
    InvalidDocument { id: String, message: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
