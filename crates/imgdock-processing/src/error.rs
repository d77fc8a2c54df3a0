use thiserror::Error;

/// Image processing errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => ImageError::UnsupportedFormat(e.to_string()),
            image::ImageError::Decoding(e) => ImageError::Decode(e.to_string()),
            image::ImageError::IoError(e) => ImageError::Decode(e.to_string()),
            image::ImageError::Limits(e) => ImageError::InvalidParameter(e.to_string()),
            other => ImageError::Encode(other.to_string()),
        }
    }
}

/// Failure of one item in a batch, tagged with the caller's index
#[derive(Debug, Error)]
#[error("Image {index}: {source}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: ImageError,
}
