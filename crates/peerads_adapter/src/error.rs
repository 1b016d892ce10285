use crate::types::Network;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("{network}: load failed: {reason}")]
    LoadFailed { network: Network, reason: String },

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
