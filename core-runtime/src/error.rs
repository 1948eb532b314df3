use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required host bridge was not injected.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Logging initialization failed: {0}")]
    Logging(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn missing(capability: &str, message: &str) -> Self {
        Error::CapabilityMissing {
            capability: capability.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
