use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to open source: {0}")]
    OpenFailed(String),

    #[error("no video stream found")]
    NoVideoStream,

    #[error("decode error: {0}")]
    Decode(String),

    #[error("seek error: {0}")]
    Seek(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True for errors raised while opening a source, before any frame was read.
    pub fn is_open_error(&self) -> bool {
        matches!(self, CoreError::OpenFailed(_) | CoreError::NoVideoStream)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
