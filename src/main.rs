use anyhow::Context;
use clap::{ArgGroup, Parser};
use imgconv::{Config, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "imgconv",
    version,
    author,
    about = "Convert images between JPEG, PNG and GIF",
    long_about = "Convert images between JPEG, PNG and GIF.\n\n\
    Every file under the source directory whose extension matches --from is \
    decoded and re-encoded as --to. Results are written under --dst, \
    mirroring the source directory layout.\n\n\
    USAGE EXAMPLES:\n  \
      # JPEG to PNG into ./output\n  \
      imgconv ./photos\n\n  \
      # PNG to GIF into a chosen directory\n  \
      imgconv ./icons --from png --to gif --dst ./gifs\n\n  \
      # Preview without writing\n  \
      imgconv ./photos --dry-run --debug"
)]
#[command(group(ArgGroup::new("source").required(true).args(["src", "src_flag"])))]
struct Cli {
    /// Source directory to scan for images
    #[arg(value_name = "SRC")]
    src: Option<PathBuf>,

    /// Source directory, as an alternative to the positional SRC
    #[arg(long = "src", value_name = "PATH")]
    src_flag: Option<PathBuf>,

    /// Destination root for converted images
    #[arg(short = 'o', long, default_value = "output", value_name = "PATH")]
    dst: PathBuf,

    /// Extension to convert from (jpeg, jpg, png, gif)
    #[arg(short, long, default_value = "jpeg", value_name = "EXT")]
    from: String,

    /// Extension to convert to (jpeg, jpg, png, gif)
    #[arg(short, long, default_value = "png", value_name = "EXT")]
    to: String,

    /// Debug output
    #[arg(short, long)]
    debug: bool,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Nest output under the source directory's name
    #[arg(long)]
    keep_root_name: bool,

    /// Directory glob to skip, relative to SRC (can be used multiple times)
    ///
    /// Example: imgconv ./photos --exclude "**/thumbs" --exclude cache
    #[arg(short, long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Print run statistics as JSON instead of a summary table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let source_dir = cli
        .src
        .or(cli.src_flag)
        .context("A source directory is required")?;

    let config = Config::builder()
        .source_dir(source_dir)
        .output_dir(cli.dst)
        .from(cli.from)
        .to(cli.to)
        .debug(cli.debug)
        .dry_run(cli.dry_run)
        .keep_root_name(cli.keep_root_name)
        .exclude_directories(cli.exclude)
        .build()
        .context("Invalid arguments")?;

    setup_tracing(config.debug)?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?
        );
    } else {
        stats.print_summary();
    }

    Ok(())
}

fn setup_tracing(debug: bool) -> anyhow::Result<()> {
    let filter = if debug {
        EnvFilter::new("imgconv=debug")
    } else {
        EnvFilter::new("imgconv=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
