use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T, E = VideoIoError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VideoIoError {
    /// A writer was requested with a zero frame rate or frame dimension.
    #[error(
        "one of the numerical parameters is equal to zero: FPS: {fps:.6}, width: {width}, height: {height}"
    )]
    InvalidParameter { fps: f64, width: i32, height: i32 },
    /// Codec names are exactly four characters long.
    #[error("codec must be exactly four characters, got {0:?}")]
    InvalidCodec(String),
    #[error("failed to open video source {uri:?}")]
    OpenFailed { uri: String },
    /// Input could not be interpreted as a device index or a source string.
    #[error("argument must be an integer device index or a string, got {0}")]
    InvalidArgument(String),
    #[error("video handle has been closed")]
    Closed,
    #[cfg(feature = "with-opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
    /// Failure reported by a non-OpenCV backend.
    #[error("{0}")]
    Backend(String),
}
