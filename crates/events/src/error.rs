use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Cannot encode json: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Cannot decode json: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Unknown event type {0}")]
    UnknownTag(u16),
}

pub type Result<T> = std::result::Result<T, EventError>;
