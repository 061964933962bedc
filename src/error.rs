use crate::format::ImageFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the imgconv library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Source directory could not be inspected.
    #[error("{path} failed to get directory: {message}")]
    SourceAccess {
        /// Path that was inspected
        path: PathBuf,
        /// Underlying OS message
        message: String,
    },

    /// Source path exists but is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// Offending path
        path: PathBuf,
    },

    /// Extension outside the supported set.
    #[error("{side} ext {extension} is not supported")]
    UnsupportedExtension {
        /// Which flag carried the extension (`from` or `to`)
        side: &'static str,
        /// Extension after normalization
        extension: String,
    },

    /// Source and target formats are identical.
    #[error("-from and -to are same. -from {from}, -to {to}")]
    SameExtension {
        /// Normalized source extension
        from: String,
        /// Normalized target extension
        to: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Image could not be decoded.
    #[error("Failed to decode {format} image '{path}': {message}")]
    Decode {
        /// Input file
        path: PathBuf,
        /// Format the decoder was forced to
        format: ImageFormat,
        /// Codec message
        message: String,
    },

    /// Image could not be encoded.
    #[error("Failed to encode {format} image '{path}': {message}")]
    Encode {
        /// Output file
        path: PathBuf,
        /// Target format
        format: ImageFormat,
        /// Codec message
        message: String,
    },

    /// Two source files would be written to the same output file.
    #[error("'{first}' and '{second}' would both be written to '{destination}'")]
    DuplicateDestination {
        /// Shared output path
        destination: PathBuf,
        /// Source reached first in walk order
        first: PathBuf,
        /// Source that would overwrite it
        second: PathBuf,
    },

    /// Directory traversal failed.
    #[error("Failed to walk '{path}': {message}")]
    Walk {
        /// Path being visited when the walk failed
        path: PathBuf,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(
        path: impl Into<PathBuf>,
        format: ImageFormat,
        source: &image::ImageError,
    ) -> Self {
        Self::Decode {
            path: path.into(),
            format,
            message: source.to_string(),
        }
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(
        path: impl Into<PathBuf>,
        format: ImageFormat,
        source: &image::ImageError,
    ) -> Self {
        Self::Encode {
            path: path.into(),
            format,
            message: source.to_string(),
        }
    }

    /// Returns true if this error was raised while validating input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::SourceAccess { .. }
                | Self::NotADirectory { .. }
                | Self::UnsupportedExtension { .. }
                | Self::SameExtension { .. }
                | Self::Config { .. }
        )
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Self::Walk {
            path: e.path().map(PathBuf::from).unwrap_or_default(),
            message: e.to_string(),
        }
    }
}
