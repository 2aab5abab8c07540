use thiserror::Error;

pub type Result<T, E = SpamFilterError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SpamFilterError {
    #[error("spam api transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("spam api responded with status {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Store(String),

    #[error("invalid report: {0}")]
    InvalidReport(String),
}

impl From<redis::RedisError> for SpamFilterError {
    fn from(err: redis::RedisError) -> Self {
        SpamFilterError::Store(err.to_string())
    }
}
