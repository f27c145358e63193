use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Input path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid path")]
    InvalidPath,

    #[error("No usable font could be loaded")]
    FontUnavailable,
}
