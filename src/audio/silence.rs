use tracing::debug;

use super::AudioBuffer;

/// Length of one analysis frame in the silence profile.
const ANALYSIS_FRAME_MS: u64 = 10;

/// Split a buffer into its non-silent spans.
///
/// The buffer is scanned in fixed analysis frames; a frame is silent when its
/// RMS falls below `silence_thresh` dBFS. Maximal silent runs of at least
/// `min_silence_len` ms are removed entirely, and the spans between them are
/// returned in order. No qualifying run means the whole input comes back as a
/// single segment; an input that is silence throughout yields an empty list.
pub fn split_on_silence(
    buffer: &AudioBuffer,
    min_silence_len: u64,
    silence_thresh: f32,
) -> Vec<AudioBuffer> {
    if buffer.is_empty() {
        return Vec::new();
    }

    let frame_len = buffer.frame_at_ms(ANALYSIS_FRAME_MS).max(1);
    let profile = silence_profile(buffer, frame_len, silence_thresh);
    let min_run = (min_silence_len.div_ceil(ANALYSIS_FRAME_MS)).max(1) as usize;
    let spans = keep_spans(&profile, min_run);

    debug!(
        "silence profile: {} frames, {} span(s) kept",
        profile.len(),
        spans.len()
    );

    spans
        .into_iter()
        .map(|(start, end)| buffer.slice_frames(start * frame_len, end * frame_len))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Classify each analysis frame as silent (true) or not. The trailing
/// partial frame is included.
fn silence_profile(buffer: &AudioBuffer, frame_len: usize, silence_thresh: f32) -> Vec<bool> {
    let frames = buffer.frames();
    let count = frames.div_ceil(frame_len);
    (0..count)
        .map(|i| {
            let frame = buffer.slice_frames(i * frame_len, (i + 1) * frame_len);
            frame.dbfs() < silence_thresh
        })
        .collect()
}

/// Spans of analysis frames that survive silence removal, as `[start, end)`
/// pairs. Silent runs shorter than `min_run` frames stay part of their
/// surrounding span.
fn keep_spans(profile: &[bool], min_run: usize) -> Vec<(usize, usize)> {
    let mut removals: Vec<(usize, usize)> = Vec::new();
    let mut run_start = None;

    for (i, &silent) in profile.iter().enumerate() {
        match (silent, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if i - start >= min_run {
                    removals.push((start, i));
                }
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        if profile.len() - start >= min_run {
            removals.push((start, profile.len()));
        }
    }

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end) in removals {
        if start > cursor {
            spans.push((cursor, start));
        }
        cursor = end;
    }
    if cursor < profile.len() {
        spans.push((cursor, profile.len()));
    }
    spans
}
