use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("bridge: {0}")]
    Bridge(String),
    #[error("serde-json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
