use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use encdetect::discovery::{self, DiscoveryConfig, DEFAULT_PATTERN};
use encdetect::reader::{FileDetector, ReaderConfig};
use encdetect::report::{hex, FileStats, RunStats};

#[derive(Parser, Debug)]
#[command(name = "encdetect")]
#[command(about = "Detect ASCII, UTF-8 and UTF-16 text file encodings and decode them")]
#[command(version)]
struct Args {
    /// File, or directory to scan recursively
    root: PathBuf,

    /// Glob matched against file names when scanning a directory
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Walk the directory tree on multiple threads
    #[arg(long)]
    parallel: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Use memory-mapped I/O instead of async buffered reads
    #[arg(long)]
    use_mmap: bool,

    /// Print the decoded text after each result
    #[arg(long)]
    show_text: bool,

    /// Suppress console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Write per-file stats as JSON to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if !args.root.exists() {
        anyhow::bail!("Path does not exist: {}", args.root.display());
    }

    let discovery_config = DiscoveryConfig {
        fail_fast: args.fail_fast,
        pattern: args.pattern.clone(),
    };

    info!("Starting file discovery in: {}", args.root.display());
    let discovered = if args.parallel {
        discovery::collect_discovered_files_parallel(&args.root, discovery_config).await?
    } else {
        discovery::collect_discovered_files(&args.root, discovery_config).await?
    };

    let (valid, invalid): (Vec<_>, Vec<_>) = discovered.into_iter().partition(|f| f.error.is_none());
    for file in &invalid {
        if let Some(ref error) = file.error {
            info!("Skipping {}: {}", file.path.display(), error);
        }
    }

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(valid.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} files {msg}")?.progress_chars("=> "),
        );
        bar
    };

    let file_detector = FileDetector::new(ReaderConfig {
        fail_fast: args.fail_fast,
        use_mmap: args.use_mmap,
        ..Default::default()
    });

    let mut run = RunStats::default();
    for file in &valid {
        let (result, stats) = file_detector.detect_file(&file.path).await?;

        progress.suspend(|| {
            println!("{}", file.path.display());
            match &result {
                Some(result) => {
                    let bom = result.bom_marker.map(hex).unwrap_or_else(|| "none".to_string());
                    println!("({}, {})", result.encoding, bom);
                    if args.show_text {
                        println!("{}\n", result.decoded_text);
                    }
                }
                None => println!("(undetected, {})", stats.error.as_deref().unwrap_or("unknown error")),
            }
        });

        run.push(FileStats::from(&stats));
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("Files checked: {}, skipped: {}", valid.len(), invalid.len());
    for (encoding, count) in &run.totals {
        println!("  {encoding}: {count}");
    }

    if let Some(ref stats_out) = args.stats_out {
        run.write_json(stats_out).await?;
        info!("Wrote stats to {}", stats_out.display());
    }

    info!("Detection completed: {} files, {} failed", run.files.len(), run.failed());
    Ok(())
}
