use framescan_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to open file: {0}")]
    OpenFailed(String),

    #[error("no video stream found")]
    NoVideoStream,

    #[error("decoder error: {0}")]
    DecoderError(String),

    #[error("seek error: {0}")]
    SeekError(String),

    #[error("encoder error: {0}")]
    EncoderError(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// The source could not be opened at all, as opposed to failing mid-job.
    pub fn is_open_error(&self) -> bool {
        match self {
            MediaError::OpenFailed(_) | MediaError::NoVideoStream => true,
            MediaError::Core(e) => e.is_open_error(),
            _ => false,
        }
    }
}

impl From<MediaError> for CoreError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::OpenFailed(msg) => CoreError::OpenFailed(msg),
            MediaError::NoVideoStream => CoreError::NoVideoStream,
            MediaError::DecoderError(msg) | MediaError::EncoderError(msg) => CoreError::Decode(msg),
            MediaError::SeekError(msg) => CoreError::Seek(msg),
            MediaError::Core(e) => e,
            MediaError::Io(e) => CoreError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;
