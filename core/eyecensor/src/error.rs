use thiserror::Error;

#[derive(Debug, Error)]
pub enum EyeCensorError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),

    #[error("landmark index {index} out of range for {len} keypoints")]
    IndexOutOfRange { index: usize, len: usize },
}
