use super::AudioBuffer;

/// Duration bounds for chunk assembly, all in milliseconds.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Chunks shorter than this get padded before flushing.
    pub min_ms: u64,
    /// A merge is rejected when it would push the chunk past this.
    pub max_ms: u64,
    /// Target length short chunks are padded up to.
    pub ideal_pad_ms: u64,
    /// Fade applied to both sides of a merge boundary.
    pub fade_ms: u64,
    /// True-silence gap inserted between merged segments.
    pub gap_ms: u64,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            max_ms: 5000,
            ideal_pad_ms: 4000,
            fade_ms: 10,
            gap_ms: 100,
        }
    }
}

/// Pack ordered segments into chunks within the configured duration window.
///
/// Single forward pass with one accumulation buffer: each incoming segment is
/// merged into the buffer (crossfade plus a silence gap) while the merged
/// length stays within `max_ms`; otherwise the buffer is flushed — padded to
/// `ideal_pad_ms` first if it is still under `min_ms` — and the segment
/// starts a new buffer. Greedy and order-preserving; no look-ahead.
pub fn assemble(segments: Vec<AudioBuffer>, config: &AssembleConfig) -> Vec<AudioBuffer> {
    let mut result = Vec::new();
    let mut buffer: Option<AudioBuffer> = None;

    for segment in segments {
        buffer = Some(match buffer.take() {
            None => segment,
            Some(current) => {
                let merged_len =
                    current.duration_ms() + segment.duration_ms() + config.gap_ms;
                if merged_len <= config.max_ms {
                    fade_merge(current, segment, config.fade_ms, config.gap_ms)
                } else {
                    result.push(finalize(current, config));
                    segment
                }
            }
        });
    }

    if let Some(current) = buffer {
        if !current.is_empty() {
            result.push(finalize(current, config));
        }
    }

    result
}

/// Pad a short chunk up to the ideal length before it leaves the assembler.
fn finalize(chunk: AudioBuffer, config: &AssembleConfig) -> AudioBuffer {
    if chunk.duration_ms() < config.min_ms {
        chunk.pad_to_ms(config.ideal_pad_ms)
    } else {
        chunk
    }
}

/// Join two segments: fade-out the first, fade-in the second, with a
/// true-silence gap in between.
fn fade_merge(first: AudioBuffer, second: AudioBuffer, fade_ms: u64, gap_ms: u64) -> AudioBuffer {
    let gap = AudioBuffer::silent(gap_ms, first.sample_rate(), first.channels());
    first
        .fade_out(fade_ms)
        .concat(&gap)
        .concat(&second.fade_in(fade_ms))
}
