//! thumbgallery CLI - thumbnails and a static gallery page for a photo directory

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::info;

use thumbgallery::gallery::{self, StaticExporter};
use thumbgallery::{init_logging, BatchDriver, BatchReport, Config, ThumbnailWriter};

/// thumbgallery - thumbnails and a static gallery for a photo directory
#[derive(Parser)]
#[command(
    name = "thumbgallery",
    version,
    about = "Generate thumbnails for a directory of photos and optionally export a gallery page",
    long_about = "Scans a directory for images (detected by content, not extension), writes a \
                  small and a big JPEG thumbnail for each one into a .thumb subdirectory, and \
                  reports the images that could not be processed. With --export an index.html \
                  listing the successful images is written next to them."
)]
struct Cli {
    /// Directory containing the images
    #[arg(short, long, default_value = "./", value_name = "DIR")]
    path: PathBuf,

    /// Write index.html and public/ assets into the image directory
    #[arg(short, long)]
    export: bool,

    /// Configuration file path (.toml or .yaml)
    #[arg(short, long, value_name = "FILE", env = "THUMBGALLERY_CONFIG")]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

/// JSON run summary
#[derive(Serialize)]
struct RunSummary<'a> {
    images: &'a [String],
    exported: bool,
    #[serde(flatten)]
    report: &'a BatchReport,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {:#}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if cli.quiet {
        config.logging.level = "error".to_string();
    } else if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    let images = gallery::list_images(&cli.path)
        .with_context(|| format!("Failed to list images in {}", cli.path.display()))?;
    info!("Found {} images in {:?}", images.len(), cli.path);

    let mut driver = BatchDriver::new(ThumbnailWriter::from_config(&config.thumbnails))
        .show_progress(!cli.json && !cli.quiet);
    let report = driver.run(&cli.path, images.clone())?;

    let visible = gallery::filter_out_failed(images, &report.failed);

    if cli.export {
        let files = StaticExporter::new(&config.gallery)
            .export(&cli.path, &visible)
            .context("Failed to export gallery")?;
        info!("Gallery page written to {:?}", files.index);
    }

    if cli.json {
        let summary = RunSummary {
            images: &visible,
            exported: cli.export,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        print_summary(&report, cli.export);
    }

    Ok(())
}

fn print_summary(report: &BatchReport, exported: bool) {
    println!(
        "{} {} of {} images ready, {} thumbnails written in {:.2}s",
        style("Done:").green().bold(),
        report.succeeded(),
        report.total,
        report.artifacts_written,
        report.elapsed.as_secs_f64()
    );

    if !report.failed.is_empty() {
        println!("{}", style("Skipped (could not create thumbnails):").yellow());
        for image in &report.failed {
            println!("  {}", image);
        }
    }

    if exported {
        println!("Gallery exported to index.html");
    }
}
