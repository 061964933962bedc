use crate::error::{Error, Result};
use crate::filter::build_globset;
use crate::format::ImageFormat;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_FROM: &str = "jpeg";
const DEFAULT_TO: &str = "png";

/// Configuration for a conversion run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Directory tree to scan for images
    pub source_dir: PathBuf,

    /// Root of the mirrored output tree
    pub output_dir: PathBuf,

    /// Format of the files to convert
    pub from: ImageFormat,

    /// Format to convert into
    pub to: ImageFormat,

    /// Verbose diagnostic logging
    pub debug: bool,

    /// Plan the run without writing anything
    pub dry_run: bool,

    /// Nest output under the source directory's own name
    pub keep_root_name: bool,

    /// Glob patterns of directories to skip, relative to `source_dir`
    pub exclude_directories: Vec<String>,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imgconv::{Config, ImageFormat};
    ///
    /// let config = Config::builder()
    ///     .source_dir("./photos")
    ///     .from("jpg")
    ///     .to("png")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.from, ImageFormat::Jpeg);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source directory is missing or not a directory
    /// - Source and target formats are the same
    /// - An exclusion pattern is not a valid glob
    pub fn validate(&self) -> Result<()> {
        check_source_dir(&self.source_dir)?;
        check_distinct(self.from, self.to)?;
        build_globset(&self.exclude_directories)?;
        Ok(())
    }
}

fn check_source_dir(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::SourceAccess {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

fn check_distinct(from: ImageFormat, to: ImageFormat) -> Result<()> {
    if from == to {
        return Err(Error::SameExtension {
            from: from.dotted_extension().to_string(),
            to: to.dotted_extension().to_string(),
        });
    }
    Ok(())
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    from: Option<String>,
    to: Option<String>,
    debug: bool,
    dry_run: bool,
    keep_root_name: bool,
    exclude_directories: Vec<String>,
}

impl ConfigBuilder {
    /// Sets the directory to scan.
    #[must_use]
    pub fn source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(path.into());
        self
    }

    /// Sets the root of the output tree.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the source extension, e.g. `jpg`, `.png`.
    #[must_use]
    pub fn from(mut self, ext: impl Into<String>) -> Self {
        self.from = Some(ext.into());
        self
    }

    /// Sets the target extension.
    #[must_use]
    pub fn to(mut self, ext: impl Into<String>) -> Self {
        self.to = Some(ext.into());
        self
    }

    /// Enables debug logging.
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Nests output under the source directory's name.
    #[must_use]
    pub fn keep_root_name(mut self, enabled: bool) -> Self {
        self.keep_root_name = enabled;
        self
    }

    /// Sets directory glob patterns to skip.
    #[must_use]
    pub fn exclude_directories(mut self, patterns: Vec<String>) -> Self {
        self.exclude_directories = patterns;
        self
    }

    /// Builds the configuration, normalizing extensions.
    ///
    /// Checks run in order: source directory, `from`, `to`, then that the
    /// two formats differ.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn build(self) -> Result<Config> {
        let source_dir = self.source_dir.unwrap_or_else(|| PathBuf::from("."));
        check_source_dir(&source_dir)?;

        let from =
            ImageFormat::parse_extension(self.from.as_deref().unwrap_or(DEFAULT_FROM), "from")?;
        let to = ImageFormat::parse_extension(self.to.as_deref().unwrap_or(DEFAULT_TO), "to")?;

        let config = Config {
            source_dir,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            from,
            to,
            debug: self.debug,
            dry_run: self.dry_run,
            keep_root_name: self.keep_root_name,
            exclude_directories: self.exclude_directories,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder().source_dir(temp.path()).build().unwrap();

        assert_eq!(config.from, ImageFormat::Jpeg);
        assert_eq!(config.to, ImageFormat::Png);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(!config.debug);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_source_dir() {
        let err = Config::builder()
            .source_dir("/nonexistent/path/that/should/not/exist")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::SourceAccess { .. }));
        assert!(err
            .to_string()
            .starts_with("/nonexistent/path/that/should/not/exist failed to get directory"));
    }

    #[test]
    fn test_source_is_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("file");
        file.write_str("not a directory").unwrap();

        let err = Config::builder().source_dir(file.path()).build().unwrap_err();

        assert_eq!(err.to_string(), format!("{} is not a directory", file.path().display()));
    }

    #[test]
    fn test_unsupported_from() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .source_dir(temp.path())
            .from("jjpeg")
            .build()
            .unwrap_err();

        assert_eq!(err.to_string(), "from ext .jjpeg is not supported");
    }

    #[test]
    fn test_unsupported_to() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .source_dir(temp.path())
            .from("jpeg")
            .to("ppng")
            .build()
            .unwrap_err();

        assert_eq!(err.to_string(), "to ext .ppng is not supported");
    }

    #[test]
    fn test_same_extensions() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .source_dir(temp.path())
            .from("png")
            .to("png")
            .build()
            .unwrap_err();

        assert_eq!(err.to_string(), "-from and -to are same. -from .png, -to .png");
    }

    #[test]
    fn test_jpg_and_jpeg_are_same() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .source_dir(temp.path())
            .from("jpeg")
            .to("jpg")
            .build()
            .unwrap_err();

        assert_eq!(err.to_string(), "-from and -to are same. -from .jpeg, -to .jpeg");
    }

    #[test]
    fn test_source_checked_before_extensions() {
        let err = Config::builder()
            .source_dir("/nonexistent/imgconv")
            .from("bogus")
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::SourceAccess { .. }));
    }

    #[test]
    fn test_valid_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .source_dir(temp.path())
            .from(".gif")
            .to("JPG")
            .build()
            .unwrap();

        assert_eq!(config.from, ImageFormat::Gif);
        assert_eq!(config.to, ImageFormat::Jpeg);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .source_dir(temp.path())
            .exclude_directories(vec!["a[".to_string()])
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }
}
