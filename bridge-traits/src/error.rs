use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The handle was never issued by this device or has already been released.
    #[error("Unknown or released device handle: {0}")]
    InvalidHandle(String),

    #[error("Document store error: {0}")]
    StoreError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when the error only says the handle is gone.
    ///
    /// Controllers treat this as a benign race with teardown rather than a failure.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, BridgeError::InvalidHandle(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
