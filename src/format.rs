//! Supported image formats and extension handling.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Image formats the converter can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG, also accepted as `jpg`
    Jpeg,
    /// Portable Network Graphics
    Png,
    /// Graphics Interchange Format
    Gif,
}

impl ImageFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::Gif];

    /// Returns the canonical file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// Returns the canonical extension with its leading dot.
    #[must_use]
    pub const fn dotted_extension(self) -> &'static str {
        match self {
            Self::Jpeg => ".jpeg",
            Self::Png => ".png",
            Self::Gif => ".gif",
        }
    }

    /// Returns the matching codec format of the `image` crate.
    #[must_use]
    pub const fn codec(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
        }
    }

    /// Looks up a format by a bare extension (no dot, any case).
    fn from_bare(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Parses a user supplied extension.
    ///
    /// Accepts values with or without a leading dot, in any case, and
    /// treats `jpg` as `jpeg`. `side` names the flag in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedExtension`] carrying the dotted form of the
    /// input when it names no supported format.
    pub fn parse_extension(raw: &str, side: &'static str) -> Result<Self> {
        let trimmed = raw.trim();
        let dotted = if trimmed.starts_with('.') {
            trimmed.to_string()
        } else {
            format!(".{trimmed}")
        };

        Self::from_bare(&dotted[1..]).ok_or(Error::UnsupportedExtension {
            side,
            extension: dotted,
        })
    }

    /// Returns the format named by a file's extension, if any.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_bare)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
