use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use sukashi::{Config, watermark::BatchProcessor};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stamp photos with their capture date", long_about = None)]
struct Cli {
    /// Image file or directory to process
    path: PathBuf,

    /// Font size of the stamped text in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    font_size: Option<u32>,

    /// Text color: #RRGGBB, #RGB, or a color name
    #[arg(long)]
    color: Option<String>,

    /// Text placement, e.g. bottom-right, top-left, center
    #[arg(long)]
    position: Option<String>,

    /// Font file (ttf) to use for the stamped text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text opacity, 0-255
    #[arg(long)]
    opacity: Option<u8>,

    /// Distance from the image edges in pixels
    #[arg(long)]
    margin: Option<u32>,

    /// JPEG output quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Do not fall back to the file modification time when no EXIF date exists
    #[arg(long)]
    no_mtime_fallback: bool,

    /// Skip files for which no date could be determined
    #[arg(long)]
    skip_no_date: bool,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Number of files to process in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Report would-be output paths without writing anything
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long, default_value = "sukashi.toml")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also write log output to this file
    #[arg(long)]
    logfile: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match &cli.logfile {
        Some(logfile) => {
            let file = std::fs::File::create(logfile)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Arc::new(file)))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let config = if cli.config.exists() {
        let config_content = std::fs::read_to_string(&cli.config)?;
        let config = toml_edit::de::from_str::<Config>(&config_content)?;
        info!("Configuration loaded from: {:?}", cli.config);
        config
    } else {
        Config::default()
    };

    // CLI flags override config file values
    let mut options = config.watermark;
    if let Some(font_size) = cli.font_size {
        options.font_size = font_size;
    }
    if let Some(color) = cli.color {
        options.color = color;
    }
    if let Some(position) = cli.position {
        options.position = position;
    }
    if let Some(font) = cli.font {
        options.font_path = Some(font);
    }
    if let Some(opacity) = cli.opacity {
        options.opacity = opacity;
    }
    if let Some(margin) = cli.margin {
        options.margin = margin;
    }
    if let Some(quality) = cli.quality {
        options.jpeg_quality = quality;
    }
    if cli.no_mtime_fallback {
        options.use_mtime_fallback = false;
    }
    if cli.skip_no_date {
        options.skip_if_no_date = true;
    }
    if cli.dry_run {
        options.dry_run = true;
    }

    let recursive = cli.recursive || config.batch.recursive;
    let workers = cli.workers.unwrap_or(config.batch.workers);

    let processor = BatchProcessor::new(options);

    // Ctrl-C stops dispatch of new files; in-flight work finishes and the
    // partial stats are still reported.
    let cancel = processor.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight work");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let stats = processor.process_path(&cli.path, recursive, workers).await?;
    info!("{}", stats);

    Ok(())
}
