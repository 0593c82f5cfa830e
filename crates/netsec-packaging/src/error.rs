//! Error types for packaging operations.

use std::path::PathBuf;
use thiserror::Error;

pub type PackagingResult<T> = std::result::Result<T, PackagingError>;

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid package metadata: {0}")]
    InvalidMetadata(String),
}
