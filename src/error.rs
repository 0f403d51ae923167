use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The single failure kind of map construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileMapError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TileMapError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        TileMapError::InvalidInput(reason.into())
    }

    pub fn reason(&self) -> &str {
        match self {
            TileMapError::InvalidInput(reason) => reason,
        }
    }
}

/// Errors reported while persisting a rendered map.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown file extension for {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("a {width}x{height} map at scale {scale} is too large to render")]
    TooLarge {
        width: usize,
        height: usize,
        scale: u32,
    },
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors reported while loading a previously saved map image.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file {0:?} does not exist")]
    NotFound(PathBuf),
    #[error("unable to load content from file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors reported while reading a JSON map request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("failed to read map request from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse map request: {0}")]
    Parse(#[from] serde_json::Error),
}
