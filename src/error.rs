//! The error type shared across the crate.

use crate::{AboveMaxLen, MAX_CLUSTERS};

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while extracting dominant colors.
///
/// Errors are never retried or papered over: a run either returns one record
/// per cluster or fails with one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not reference an existing file.
    #[error("image not found: {}", path.display())]
    MissingInput {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be interpreted as an image.
    #[cfg(feature = "image")]
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// The path of the undecodable file.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path of the unreadable file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Clustering produced (or would produce) invalid arithmetic.
    #[error("numerical failure during clustering: {0}")]
    Numerical(String),

    /// The requested number of clusters is outside `1..=MAX_CLUSTERS`.
    #[error("invalid cluster count {0}: must be between 1 and {max}", max = MAX_CLUSTERS)]
    InvalidClusterCount(u16),

    /// The image has more pixels than can be clustered.
    #[error("too many pixels: {0}")]
    TooManyPixels(#[from] AboveMaxLen<u32>),
}

impl Error {
    /// Creates an [`Error::Numerical`] from a description of the failure.
    pub(crate) fn numerical(reason: impl Into<String>) -> Self {
        Self::Numerical(reason.into())
    }

    /// Classifies an I/O error raised while reading `path`.
    #[cfg(feature = "image")]
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingInput { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Classifies an [`image::ImageError`] raised while decoding `path`.
    #[cfg(feature = "image")]
    pub(crate) fn from_image(path: PathBuf, source: image::ImageError) -> Self {
        match source {
            image::ImageError::IoError(source) => Self::from_io(path, source),
            source => Self::Decode { path, source },
        }
    }
}
