use crate::audio::{
    assemble, read_wav, split_on_silence, split_oversized, write_wav, AssembleConfig, AudioBuffer,
};
use crate::config::ChopConfig;
use crate::error::{ChopError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Outcome of re-segmenting a single input file.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// The input file this report covers.
    pub input: PathBuf,
    /// Number of chunk files written.
    pub chunks_written: usize,
    /// Summed duration of the exported chunks.
    pub output_duration: Duration,
}

/// Aggregate statistics for a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Files handed to the batch runner.
    pub total_files: usize,
    /// Files that completed successfully.
    pub processed: usize,
    /// Files that failed (decode errors, IO errors).
    pub failed: usize,
    /// Files skipped because the run was cancelled.
    pub skipped: usize,
    /// Chunk files written across all inputs.
    pub chunks_written: usize,
    /// Wall-clock time for the whole batch.
    pub total_time: Duration,
}

/// Per-file outcome collected by the batch runner.
#[derive(Debug)]
struct FileOutcome {
    report: Option<FileReport>,
    error: Option<String>,
    skipped: bool,
}

/// Run the full segmentation pipeline over an in-memory buffer.
///
/// Pure and synchronous: silence-boundary segmentation, quiet-point splitting
/// of oversized phrases, then greedy merge-or-pad assembly. An empty or
/// all-silent input resolves to zero chunks.
pub fn process_buffer(buffer: &AudioBuffer, config: &ChopConfig) -> Vec<AudioBuffer> {
    let phrases = split_on_silence(buffer, config.min_silence_len, config.silence_thresh);
    debug!("{} phrase(s) after silence segmentation", phrases.len());

    let mut segments = Vec::new();
    for phrase in phrases {
        if phrase.duration_ms() > config.max_ms() {
            segments.extend(split_oversized(phrase, config.max_ms(), config.fade_ms));
        } else {
            segments.push(phrase);
        }
    }
    debug!("{} segment(s) after quiet-point splitting", segments.len());

    assemble(
        segments,
        &AssembleConfig {
            min_ms: config.min_ms(),
            max_ms: config.max_ms(),
            ideal_pad_ms: config.ideal_pad_ms(),
            fade_ms: config.fade_ms,
            gap_ms: config.gap_ms,
        },
    )
}

/// Re-segment one WAV file and export its chunks.
///
/// Chunks are written to `output_dir` as `{stem}_partNNN.wav` with a 1-based,
/// zero-padded index following assembly order. One line is logged per
/// exported chunk.
pub fn process_file(input: &Path, output_dir: &Path, config: &ChopConfig) -> Result<FileReport> {
    if !input.exists() {
        return Err(ChopError::FileNotFound(input.display().to_string()));
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ChopError::InvalidAudioInput(format!(
                "cannot derive a base name from {}",
                input.display()
            ))
        })?
        .to_string();

    let buffer = read_wav(input)?;
    let chunks = process_buffer(&buffer, config);

    fs::create_dir_all(output_dir)?;

    let mut output_ms = 0u64;
    for (i, chunk) in chunks.iter().enumerate() {
        let out_path = output_dir.join(format!("{}_part{:03}.wav", stem, i + 1));
        write_wav(&out_path, chunk)?;
        output_ms += chunk.duration_ms();
        info!(
            "Exported: {} (length={} ms)",
            out_path.display(),
            chunk.duration_ms()
        );
    }

    Ok(FileReport {
        input: input.to_path_buf(),
        chunks_written: chunks.len(),
        output_duration: Duration::from_millis(output_ms),
    })
}

/// WAV files directly inside `dir`, sorted by name for deterministic
/// dispatch order.
pub fn list_wav_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ChopError::FileNotFound(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if ext.eq_ignore_ascii_case("wav") {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Process a batch of files across a bounded worker pool.
///
/// Each file runs independently on the blocking thread pool; a semaphore
/// bounds parallelism to `workers` (all available CPUs when unset). Per-file
/// failures are logged and counted without aborting the batch. Setting the
/// cancellation flag stops files that have not started yet.
pub async fn run_batch(
    files: Vec<PathBuf>,
    output_dir: &Path,
    config: &ChopConfig,
    show_progress: bool,
    cancelled: Arc<AtomicBool>,
) -> BatchReport {
    let total_files = files.len();
    let start_time = Instant::now();

    let workers = config.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    info!(
        "Processing {} file(s) with {} worker(s)",
        total_files, workers
    );

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut futures = FuturesUnordered::new();

    for file in files {
        let sem = semaphore.clone();
        let cfg = config.clone();
        let out_dir = output_dir.to_path_buf();
        let pb = progress_bar.clone();
        let cancelled = cancelled.clone();

        futures.push(async move {
            let _permit = sem.acquire().await.expect("semaphore closed");

            if cancelled.load(Ordering::Relaxed) {
                return FileOutcome {
                    report: None,
                    error: None,
                    skipped: true,
                };
            }

            let worker_file = file.clone();
            let joined =
                tokio::task::spawn_blocking(move || process_file(&worker_file, &out_dir, &cfg))
                    .await;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            match joined {
                Ok(Ok(report)) => {
                    debug!(
                        "{}: {} chunk(s) written",
                        file.display(),
                        report.chunks_written
                    );
                    FileOutcome {
                        report: Some(report),
                        error: None,
                        skipped: false,
                    }
                }
                Ok(Err(e)) => {
                    warn!("{} failed: {}", file.display(), e);
                    FileOutcome {
                        report: None,
                        error: Some(e.to_string()),
                        skipped: false,
                    }
                }
                Err(e) => {
                    warn!("{} worker panicked: {}", file.display(), e);
                    FileOutcome {
                        report: None,
                        error: Some(e.to_string()),
                        skipped: false,
                    }
                }
            }
        });
    }

    let mut outcomes: Vec<FileOutcome> = Vec::with_capacity(total_files);
    while let Some(outcome) = futures.next().await {
        outcomes.push(outcome);
    }

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    let processed = outcomes.iter().filter(|o| o.report.is_some()).count();
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    let skipped = outcomes.iter().filter(|o| o.skipped).count();
    let chunks_written = outcomes
        .iter()
        .filter_map(|o| o.report.as_ref())
        .map(|r| r.chunks_written)
        .sum();

    let total_time = start_time.elapsed();
    info!(
        "Batch complete: {}/{} file(s) in {:.2}s",
        processed,
        total_files,
        total_time.as_secs_f64()
    );

    BatchReport {
        total_files,
        processed,
        failed,
        skipped,
        chunks_written,
        total_time,
    }
}

/// Print a closing summary for a batch run.
pub fn print_summary(report: &BatchReport, output_dir: &Path) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                      Splitting Complete                        ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output dir: {}", output_dir.display());
    println!("  Files:      {}/{}", report.processed, report.total_files);
    if report.failed > 0 {
        println!("  Failed:     {}", report.failed);
    }
    if report.skipped > 0 {
        println!("  Skipped:    {}", report.skipped);
    }
    println!("  Chunks:     {}", report.chunks_written);
    println!(
        "  Elapsed:    {:.2}s",
        report.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16000;

    fn tone(duration_ms: u64) -> AudioBuffer {
        let frames = (duration_ms * RATE as u64 / 1000) as usize;
        AudioBuffer::new(vec![0.5; frames], RATE, 1)
    }

    fn speech_like(parts: &[(u64, bool)]) -> AudioBuffer {
        let mut buffer = AudioBuffer::new(Vec::new(), RATE, 1);
        for &(ms, loud) in parts {
            let part = if loud {
                tone(ms)
            } else {
                AudioBuffer::silent(ms, RATE, 1)
            };
            buffer = buffer.concat(&part);
        }
        buffer
    }

    #[test]
    fn test_silent_input_yields_no_chunks() {
        let config = ChopConfig::default();
        let buffer = AudioBuffer::silent(2000, RATE, 1);
        assert!(process_buffer(&buffer, &config).is_empty());
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let config = ChopConfig::default();
        let buffer = AudioBuffer::new(Vec::new(), RATE, 1);
        assert!(process_buffer(&buffer, &config).is_empty());
    }

    #[test]
    fn test_chunks_respect_duration_window() {
        let config = ChopConfig::default();
        let buffer = speech_like(&[
            (2500, true),
            (400, false),
            (7000, true),
            (350, false),
            (600, true),
        ]);
        let chunks = process_buffer(&buffer, &config);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            let len = chunk.duration_ms();
            assert!(
                len <= config.max_ms() + config.gap_ms || len == config.ideal_pad_ms(),
                "chunk of {len} ms out of bounds"
            );
            assert!(
                len >= config.min_ms() || len == config.ideal_pad_ms(),
                "short chunk of {len} ms not padded"
            );
        }
    }

    #[test]
    fn test_short_tail_is_padded() {
        let config = ChopConfig::default();
        let buffer = speech_like(&[(300, true)]);
        let chunks = process_buffer(&buffer, &config);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].duration_ms(), config.ideal_pad_ms());
    }

    #[test]
    fn test_oversized_phrase_is_split() {
        let config = ChopConfig::default();
        let buffer = tone(12000);
        let chunks = process_buffer(&buffer, &config);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.duration_ms() <= config.max_ms() + config.gap_ms);
        }
    }

    #[test]
    fn test_chunk_format_preserved() {
        let config = ChopConfig::default();
        let frames = 2 * 44100 * 3;
        let buffer = AudioBuffer::new(vec![0.5; frames], 44100, 2);
        let chunks = process_buffer(&buffer, &config);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert_eq!(chunk.sample_rate(), 44100);
            assert_eq!(chunk.channels(), 2);
        }
    }
}
