// ABOUTME: Error types for loading image descriptors.
// ABOUTME: Uses thiserror; every variant names the offending source.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read image info file: {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image info resource not found: {0}")]
    ResourceNotFound(String),

    #[error("failed to parse image info: {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing image field in image info: {0}")]
    MissingImage(String),

    #[error("bad image field in image info: {0}")]
    BadImage(String),
}

impl Error {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        Error::Read {
            location: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
