//! # imgconv
//!
//! Recursively converts images between JPEG, PNG and GIF, writing the
//! results into a directory tree that mirrors the source.
//!
//! ## Quick Start
//!
//! ```no_run
//! use imgconv::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .source_dir("./photos")
//!     .output_dir("./converted")
//!     .from("jpg")
//!     .to("png")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Config**: normalizes extensions (`jpg` is `jpeg`) and validates input
//! 2. **Scanner**: walks the source tree, keeping files of the source format
//! 3. **Converter**: decodes, re-encodes and writes each file in turn
//!
//! Codecs come from the [`image`] crate.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod converter;
mod error;
mod file;
mod filter;
mod format;
mod pipeline;
mod scanner;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use file::{ConvertedFile, ImageFile};
pub use format::ImageFormat;
pub use pipeline::{ConversionStats, Pipeline};

/// Runs a complete conversion with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The source tree cannot be walked
/// - Any matching image fails to decode, encode or write
///
/// # Examples
///
/// ```no_run
/// use imgconv::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .source_dir(".")
///     .from("png")
///     .to("gif")
///     .build()?;
///
/// let stats = run(config)?;
/// println!("{} files converted", stats.files_converted);
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<ConversionStats> {
    Pipeline::new(config)?.run()
}
