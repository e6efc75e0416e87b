use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dmg_quantize::PaletteMode;
use img2dmg::error::ExportError;
use img2dmg::models::{AppConfig, JobView};
use img2dmg::services::{ingest_path, Artifact, ExportScope, JobQueue, QueueStats, RasterConverter};

#[derive(Parser)]
#[command(name = "img2dmg")]
#[command(about = "Convert images to the four-color retro handheld palette")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PNG/JPEG/WEBP images or ZIP archives of them
    Convert {
        /// Image files or ZIP archives
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Palette mode: "dmg" or "gray"
        #[arg(short, long)]
        mode: Option<PaletteMode>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bundle all results into one ZIP instead of separate PNGs
        #[arg(long)]
        zip: bool,

        /// Config file (YAML); defaults to $IMG2DMG_CONFIG
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,

        /// Debug logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the palette colors
    Palette {
        /// Only show this mode
        #[arg(short, long)]
        mode: Option<PaletteMode>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert {
            inputs,
            mode,
            output,
            zip,
            config,
            json,
            verbose,
        }) => {
            init_tracing(verbose);
            let config = AppConfig::load(AppConfig::resolve_path(config).as_deref());
            let options = ConvertOptions {
                mode: mode.unwrap_or(config.mode),
                output_dir: output.unwrap_or(config.output_dir),
                zip: zip || config.zip,
                json,
            };
            run_convert_command(&inputs, options).await
        }
        Some(Commands::Palette { mode }) => {
            run_palette_command(mode);
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "img2dmg=debug" } else { "img2dmg=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

struct ConvertOptions {
    mode: PaletteMode,
    output_dir: PathBuf,
    zip: bool,
    json: bool,
}

/// An input that was not accepted into the queue
#[derive(Serialize)]
struct Rejected {
    input: String,
    error: String,
}

#[derive(Serialize)]
struct Summary {
    mode: String,
    output_dir: String,
    stats: QueueStats,
    written: Vec<String>,
    rejected: Vec<Rejected>,
    jobs: Vec<JobView>,
}

/// Convert every input, wait for the queue to drain, write the artifacts
async fn run_convert_command(inputs: &[PathBuf], options: ConvertOptions) -> anyhow::Result<()> {
    let queue = JobQueue::start(options.mode, Arc::new(RasterConverter::new()));

    let mut rejected = Vec::new();
    for input in inputs {
        match ingest_path(&queue, input).await {
            Ok(ids) => tracing::debug!(input = %input.display(), jobs = ids.len(), "Input accepted"),
            Err(e) => {
                tracing::warn!(input = %input.display(), error = %e, "Input rejected");
                rejected.push(Rejected {
                    input: input.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let stats = queue.wait_idle().await;
    tracing::info!(
        done = stats.done,
        failed = stats.error,
        rejected = rejected.len(),
        "Queue drained"
    );

    let artifacts = collect_artifacts(&queue, options.zip).await?;
    let mut written = Vec::with_capacity(artifacts.len());
    if !artifacts.is_empty() {
        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .with_context(|| format!("creating {}", options.output_dir.display()))?;
    }
    for artifact in &artifacts {
        let path = write_artifact(&options.output_dir, artifact).await?;
        written.push(path.display().to_string());
    }

    let jobs = queue.snapshot().await;
    queue.shutdown().await;

    let summary = Summary {
        mode: options.mode.to_string(),
        output_dir: options.output_dir.display().to_string(),
        stats,
        written,
        rejected,
        jobs,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if summary.stats.done == 0 {
        anyhow::bail!("No images were converted");
    }
    Ok(())
}

async fn collect_artifacts(queue: &JobQueue, zip: bool) -> anyhow::Result<Vec<Artifact>> {
    let result = if zip {
        queue.export_many(ExportScope::All).await.map(|a| vec![a])
    } else {
        queue.export_each(ExportScope::All).await
    };

    match result {
        Ok(artifacts) => Ok(artifacts),
        Err(ExportError::Empty) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_artifact(dir: &Path, artifact: &Artifact) -> anyhow::Result<PathBuf> {
    let path = dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), size = artifact.bytes.len(), "Wrote artifact");
    Ok(path)
}

fn print_summary(summary: &Summary) {
    for job in &summary.jobs {
        match (&job.error, job.width, job.height) {
            (Some(error), _, _) => println!("  ✗ {}  {}", job.source_name, error),
            (None, Some(w), Some(h)) => println!("  ✓ {}  {w}x{h}", job.source_name),
            _ => println!("  - {}  {}", job.source_name, job.status),
        }
    }
    for r in &summary.rejected {
        println!("  ✗ {}  {}", r.input, r.error);
    }

    println!(
        "\n{} converted, {} failed, {} rejected ({} palette)",
        summary.stats.done,
        summary.stats.error,
        summary.rejected.len(),
        summary.mode
    );
    for path in &summary.written {
        println!("Wrote {path}");
    }
}

/// Print the palette table
fn run_palette_command(mode: Option<PaletteMode>) {
    let modes: Vec<PaletteMode> = match mode {
        Some(m) => vec![m],
        None => PaletteMode::ALL.to_vec(),
    };

    for (i, mode) in modes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{mode} (suffix {}):", mode.file_suffix());
        for (band, entry) in mode.palette().entries().iter().enumerate() {
            println!("  {band}  {entry}");
        }
    }
}

/// Display version and usage
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("img2dmg v{VERSION}");
    println!("Convert images to the four-color retro handheld palette\n");

    println!("Environment Variables:");
    println!(
        "  {} = {}",
        img2dmg::models::CONFIG_ENV,
        std::env::var(img2dmg::models::CONFIG_ENV)
            .as_deref()
            .unwrap_or("(not set)")
    );

    println!("\nCommands:");
    println!("  img2dmg convert   Convert images or ZIP archives");
    println!("  img2dmg palette   Show palette colors");
    println!("\nRun 'img2dmg --help' for more details.");
}
