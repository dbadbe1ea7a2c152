use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Failed to load tile {key}: {source}")]
    TileLoad {
        key: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write output {}: {reason}", path.display())]
    OutputWrite { path: PathBuf, reason: String },
    #[error("Failed to load font {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },
    #[error("Post-processing failed: {0}")]
    PostProcess(String),
}

pub type Result<T> = std::result::Result<T, CollageError>;
