use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DipsabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a directory: {}", path.display())]
    InvalidDirectory { path: PathBuf },
    #[error("Invalid location in layer {index}: {}", path.display())]
    InvalidSection { index: usize, path: PathBuf },
    #[error("Cannot decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Project file error: {0}")]
    Project(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DipsabError>;
