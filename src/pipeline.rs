use crate::{
    config::Config,
    converter::Converter,
    error::{Error, Result},
    file::{ConvertedFile, ImageFile},
    filter::PathFilter,
    format::ImageFormat,
    scanner::Scanner,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{debug, info, instrument, warn};

/// Statistics collected during a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    /// Source format
    pub from: ImageFormat,

    /// Target format
    pub to: ImageFormat,

    /// Regular files visited by the walk
    pub files_visited: usize,

    /// Files matching the source format
    pub files_matched: usize,

    /// Files converted (planned, in dry run)
    pub files_converted: usize,

    /// Directories skipped by exclusion rules
    pub directories_excluded: usize,

    /// Whether anything was written
    pub dry_run: bool,

    /// Root the mirrored tree was written under
    pub output_directory: PathBuf,

    /// Every source to destination mapping
    pub converted: Vec<ConvertedFile>,

    /// Time spent scanning
    pub scan_duration: Duration,

    /// Time spent converting
    pub convert_duration: Duration,

    /// Total execution time
    pub duration: Duration,
}

impl ConversionStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║               Conversion Summary                      ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!(
            "║ Conversion:           {:>8} -> {:<8}             ║",
            self.from, self.to
        );
        println!(
            "║ Files Scanned:        {:>8}                        ║",
            self.files_visited
        );
        println!(
            "║ Files Matched:        {:>8}                        ║",
            self.files_matched
        );
        println!(
            "║ Files Converted:      {:>8}                        ║",
            self.files_converted
        );
        println!(
            "║ Directories Skipped:  {:>8}                        ║",
            self.directories_excluded
        );
        println!("║ Output Directory:                                     ║");
        println!("║   {:<52}║", fit_to_width(&self.output_directory.display().to_string(), 52));
        println!("║                                                       ║");
        println!(
            "║   - Scanning:         {:>8.2}s                     ║",
            self.scan_duration.as_secs_f64()
        );
        println!(
            "║   - Converting:       {:>8.2}s                     ║",
            self.convert_duration.as_secs_f64()
        );
        println!(
            "║   - Total:            {:>8.2}s                     ║",
            self.duration.as_secs_f64()
        );
        if self.dry_run {
            println!("║ ⚠ No files were written (dry run mode)               ║");
        }
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Scans a source tree and converts every matching image.
pub struct Pipeline {
    config: Config,
    output_root: PathBuf,
    scanner: Scanner,
    converter: Converter,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// Relative output paths are resolved against the current directory
    /// here, once.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - A path cannot be made absolute
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        debug!("Configuration: {:?}", config);

        let source_dir = normalize_lexically(&absolute(&config.source_dir)?);
        let output_dir = normalize_lexically(&absolute(&config.output_dir)?);
        debug!("Output root: {}", output_dir.display());

        let output_root = if config.keep_root_name {
            nest_under_source_name(&config.source_dir, output_dir.clone())?
        } else {
            output_dir.clone()
        };

        let mut excluded_roots = Vec::new();
        if output_dir != source_dir && output_dir.starts_with(&source_dir) {
            excluded_roots.push(output_dir);
        }

        let filter = PathFilter::new(config.from, &config.exclude_directories, excluded_roots)?;
        let scanner = Scanner::new(source_dir, filter);
        let converter = Converter::new(config.from, config.to);

        Ok(Self {
            config,
            output_root,
            scanner,
            converter,
        })
    }

    /// Returns the directory the mirrored tree is written under.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Executes the run and returns statistics.
    ///
    /// Files are converted one at a time; the first failure aborts the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk, a decode, an encode or a write fails,
    /// or if two sources would map to the same output file. The latter is
    /// checked before anything is written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imgconv::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .source_dir("./photos")
    ///     .from("png")
    ///     .to("gif")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(source_dir = %self.config.source_dir.display()))]
    pub fn run(self) -> Result<ConversionStats> {
        let start_time = Instant::now();

        info!(
            "Converting {} images to {}",
            self.config.from, self.config.to
        );

        let scan_start = Instant::now();
        let (files, scan_stats) = self.scanner.scan()?;
        let scan_duration = scan_start.elapsed();

        info!(
            "✓ Found {} {} files ({} scanned) in {:.2}s",
            scan_stats.files_matched,
            self.config.from,
            scan_stats.files_visited,
            scan_duration.as_secs_f64()
        );

        check_unique_destinations(&files, &self.output_root, self.config.to)?;

        let convert_start = Instant::now();
        let converted = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            self.plan(&files)
        } else {
            self.convert_all(&files)?
        };
        let convert_duration = convert_start.elapsed();

        let duration = start_time.elapsed();
        info!(
            "✓ Converted {} files in {:.2}s",
            converted.len(),
            duration.as_secs_f64()
        );

        Ok(ConversionStats {
            from: self.config.from,
            to: self.config.to,
            files_visited: scan_stats.files_visited,
            files_matched: scan_stats.files_matched,
            files_converted: converted.len(),
            directories_excluded: scan_stats.directories_excluded,
            dry_run: self.config.dry_run,
            output_directory: self.output_root,
            converted,
            scan_duration,
            convert_duration,
            duration,
        })
    }

    fn convert_all(&self, files: &[ImageFile]) -> Result<Vec<ConvertedFile>> {
        let mut converted = Vec::with_capacity(files.len());

        for file in files {
            let destination = file.destination(&self.output_root, self.config.to);
            self.converter.convert(&file.path, &destination)?;

            info!(
                "Converted {} -> {}",
                file.path.display(),
                destination.display()
            );

            converted.push(ConvertedFile {
                source: file.path.clone(),
                destination,
            });
        }

        Ok(converted)
    }

    fn plan(&self, files: &[ImageFile]) -> Vec<ConvertedFile> {
        files
            .iter()
            .map(|file| {
                let destination = file.destination(&self.output_root, self.config.to);
                info!(
                    "Would convert {} -> {}",
                    file.path.display(),
                    destination.display()
                );
                ConvertedFile {
                    source: file.path.clone(),
                    destination,
                }
            })
            .collect()
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(path, e))
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !normalized.has_root() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Fails if two files map to one destination, e.g. `a.jpg` and `a.jpeg`.
fn check_unique_destinations(
    files: &[ImageFile],
    output_root: &Path,
    to: ImageFormat,
) -> Result<()> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());

    for file in files {
        let destination = file.destination(output_root, to);
        if let Some(first) = seen.get(&destination) {
            return Err(Error::DuplicateDestination {
                destination,
                first: first.to_path_buf(),
                second: file.path.clone(),
            });
        }
        seen.insert(destination, &file.path);
    }

    Ok(())
}

/// Pads or left-truncates `text` to exactly `width` characters.
fn fit_to_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    let tail: String = text.chars().skip(len - (width - 3)).collect();
    format!("...{tail}")
}

/// Appends the source directory's own name to `output_dir`.
///
/// The source is canonicalized first so that `.` resolves to a real name.
fn nest_under_source_name(source_dir: &Path, output_dir: PathBuf) -> Result<PathBuf> {
    let canonical = std::fs::canonicalize(source_dir).map_err(|e| Error::io(source_dir, e))?;

    match canonical.file_name() {
        Some(name) => {
            debug!("Source directory name: {}", name.to_string_lossy());
            Ok(output_dir.join(name))
        }
        None => Ok(output_dir),
    }
}
