use crate::config::Environment;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeerAdsError {
    /// Missing or malformed configuration. Fatal to the call.
    #[error("config: {0}")]
    Config(String),

    /// The request could not be sent, or the server answered non-2xx.
    #[error("transport: {message}")]
    Transport { status: Option<u16>, message: String },

    /// The response did not have the expected shape.
    #[error("decode: {0}")]
    Decode(String),

    #[error("missing secret key for {environment} environment")]
    MissingCredential { environment: Environment },
}

impl PeerAdsError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { status: None, message: message.into() }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport { status: Some(status), message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, PeerAdsError>;
