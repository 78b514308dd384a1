use crate::config::{ChopConfig, INTERACTIVE_SILENCE_THRESH_DB};
use crate::pipeline::list_wav_files;
use console::style;
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

/// Parameters collected by the wizard.
pub struct InteractiveResult {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: ChopConfig,
}

/// Collect splitting parameters through prompts instead of flags.
///
/// Same pipeline as the flag-driven CLI; only the silence threshold default
/// differs (-60 dBFS, tuned for quiet home recordings).
pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    let input_dir = select_input_dir()?;
    let output_dir = select_output_dir()?;
    let config = collect_config()?;

    print_settings(&input_dir, &output_dir, &config);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    Ok(InteractiveResult {
        input_dir,
        output_dir,
        config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║         wavchop - pause-aware WAV splitter        ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn select_input_dir() -> anyhow::Result<PathBuf> {
    loop {
        let path: String = Input::new()
            .with_prompt("Input directory")
            .default(".".to_string())
            .interact_text()?;
        let dir = PathBuf::from(path);

        match list_wav_files(&dir) {
            Ok(files) if files.is_empty() => {
                println!(
                    "{} No WAV files in {}",
                    style("!").yellow(),
                    dir.display()
                );
            }
            Ok(files) => {
                println!(
                    "{} Found {} WAV file(s)",
                    style("✓").green(),
                    files.len()
                );
                return Ok(dir);
            }
            Err(e) => {
                println!("{} {}", style("!").yellow(), e);
            }
        }
    }
}

fn select_output_dir() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Output directory")
        .default("chunks".to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}

fn collect_config() -> anyhow::Result<ChopConfig> {
    let mut config = ChopConfig {
        silence_thresh: INTERACTIVE_SILENCE_THRESH_DB,
        ..ChopConfig::load().unwrap_or_default()
    };

    if !Confirm::new()
        .with_prompt("Customize splitting parameters?")
        .default(false)
        .interact()?
    {
        return Ok(config);
    }

    config.min_silence_len = Input::new()
        .with_prompt("Minimum silence length (ms)")
        .default(config.min_silence_len)
        .interact_text()?;

    config.silence_thresh = Input::new()
        .with_prompt("Silence threshold (dBFS)")
        .default(config.silence_thresh)
        .interact_text()?;

    config.min_sec = Input::new()
        .with_prompt("Minimum chunk duration (s)")
        .default(config.min_sec)
        .interact_text()?;

    config.max_sec = Input::new()
        .with_prompt("Maximum chunk duration (s)")
        .default(config.max_sec)
        .interact_text()?;

    config.fade_ms = Input::new()
        .with_prompt("Fade at cut boundaries (ms)")
        .default(config.fade_ms)
        .interact_text()?;

    config.gap_ms = Input::new()
        .with_prompt("Silence gap between merged segments (ms)")
        .default(config.gap_ms)
        .interact_text()?;

    if !Confirm::new()
        .with_prompt("Use all CPU cores?")
        .default(true)
        .interact()?
    {
        let workers: usize = Input::new().with_prompt("Worker count").interact_text()?;
        config.workers = Some(workers);
    }

    Ok(config)
}

fn print_settings(input_dir: &PathBuf, output_dir: &PathBuf, config: &ChopConfig) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:      {}", style(input_dir.display()).cyan());
    println!("  Output:     {}", style(output_dir.display()).cyan());
    println!(
        "  Silence:    {} dBFS over {} ms",
        config.silence_thresh, config.min_silence_len
    );
    println!(
        "  Chunks:     {}-{} s (pad to {} s)",
        config.min_sec, config.max_sec, config.ideal_pad_sec
    );
    println!(
        "  Boundaries: {} ms fade, {} ms gap",
        config.fade_ms, config.gap_ms
    );
    match config.workers {
        Some(n) => println!("  Workers:    {n}"),
        None => println!("  Workers:    all CPUs"),
    }
    println!();
}
