use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wavchop::config::ChopConfig;
use wavchop::interactive::run_interactive_wizard;
use wavchop::pipeline::{list_wav_files, print_summary, run_batch};

#[derive(Parser)]
#[command(name = "wavchop")]
#[command(version, about = "Split WAV recordings into bounded-duration chunks")]
#[command(
    long_about = "Re-segment recorded WAV files: cut on natural pauses, split oversized \
segments at quiet points, and merge or pad undersized segments so every output chunk \
falls within the configured duration window."
)]
struct Cli {
    /// Directory containing the input WAV files
    #[arg(long, required_unless_present = "interactive")]
    input_dir: Option<PathBuf>,

    /// Directory the chunk files are written to
    #[arg(long, required_unless_present = "interactive")]
    output_dir: Option<PathBuf>,

    /// Minimum silent-run length that splits a phrase, in ms [default: 300]
    #[arg(long)]
    min_silence_len: Option<u64>,

    /// dBFS threshold below which audio counts as silence [default: -40]
    #[arg(long, allow_hyphen_values = true)]
    silence_thresh: Option<f32>,

    /// Minimum chunk duration in seconds before padding is forced [default: 1]
    #[arg(long)]
    min_sec: Option<u64>,

    /// Maximum chunk duration in seconds [default: 5]
    #[arg(long)]
    max_sec: Option<u64>,

    /// Fade applied at every cut or merge boundary, in ms [default: 10]
    #[arg(long)]
    fade_ms: Option<u64>,

    /// Silence inserted between merged segments, in ms [default: 100]
    #[arg(long)]
    gap_ms: Option<u64>,

    /// Number of files processed in parallel [default: all CPUs]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Collect parameters through interactive prompts
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn apply_flags(config: &mut ChopConfig, cli: &Cli) {
    if let Some(v) = cli.min_silence_len {
        config.min_silence_len = v;
    }
    if let Some(v) = cli.silence_thresh {
        config.silence_thresh = v;
    }
    if let Some(v) = cli.min_sec {
        config.min_sec = v;
    }
    if let Some(v) = cli.max_sec {
        config.max_sec = v;
    }
    if let Some(v) = cli.fade_ms {
        config.fade_ms = v;
    }
    if let Some(v) = cli.gap_ms {
        config.gap_ms = v;
    }
    if let Some(v) = cli.workers {
        config.workers = Some(v);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let (input_dir, output_dir, config) = if cli.interactive {
        let wizard = run_interactive_wizard()?;
        (wizard.input_dir, wizard.output_dir, wizard.config)
    } else {
        let input_dir = cli.input_dir.clone().expect("clap enforces input_dir");
        let output_dir = cli.output_dir.clone().expect("clap enforces output_dir");

        let mut config = ChopConfig::load().context("Failed to load configuration")?;
        apply_flags(&mut config, &cli);
        (input_dir, output_dir, config)
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    let files = list_wav_files(&input_dir)
        .with_context(|| format!("Failed to scan {}", input_dir.display()))?;

    if files.is_empty() {
        warn!("No WAV files found in {}", input_dir.display());
        return Ok(());
    }

    info!("Input:  {} ({} file(s))", input_dir.display(), files.len());
    info!("Output: {}", output_dir.display());
    info!(
        "Window: {}-{} s, silence {} dBFS over {} ms",
        config.min_sec, config.max_sec, config.silence_thresh, config.min_silence_len
    );

    let cancelled = Arc::new(AtomicBool::new(false));
    let ctrlc_flag = cancelled.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted, finishing files already in flight...");
        ctrlc_flag.store(true, Ordering::Relaxed);
    })
    .context("Failed to install Ctrl+C handler")?;

    let report = run_batch(files, &output_dir, &config, true, cancelled).await;

    print_summary(&report, &output_dir);

    if report.processed == 0 && report.failed > 0 {
        anyhow::bail!("All {} file(s) failed", report.failed);
    }

    Ok(())
}
