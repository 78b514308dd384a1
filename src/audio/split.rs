use super::AudioBuffer;

/// Width of the cut-point search window, centered on the segment midpoint.
const SEARCH_RANGE_MS: u64 = 1000;

/// Step between RMS probes inside the search window.
const SEARCH_STEP_MS: u64 = 50;

/// Cut a segment that exceeds `max_len_ms` into pieces that fit.
///
/// Each cut lands at the quietest point found near the segment's midpoint,
/// with a fade-out on the left edge and a fade-in on the right edge of the
/// cut. Segments already within the limit come back untouched — no fades.
/// Fades are gain ramps, so the summed duration of the pieces equals the
/// input duration.
pub fn split_oversized(segment: AudioBuffer, max_len_ms: u64, fade_ms: u64) -> Vec<AudioBuffer> {
    if segment.duration_ms() <= max_len_ms {
        return vec![segment];
    }

    let mut result = Vec::new();
    let mut remaining = segment;
    while remaining.duration_ms() > max_len_ms {
        let cut = find_quiet_cut(&remaining, SEARCH_RANGE_MS);
        let left = remaining.slice_ms(0, cut).fade_out(fade_ms);
        let right = remaining
            .slice_ms(cut, remaining.duration_ms())
            .fade_in(fade_ms);

        if left.duration_ms() > max_len_ms {
            result.extend(split_oversized(left, max_len_ms, fade_ms));
        } else {
            result.push(left);
        }

        remaining = right;
    }
    result.push(remaining);
    result
}

/// Millisecond offset of the quietest point near the segment midpoint.
///
/// Scans a `search_range_ms` window centered on the midpoint in fixed steps
/// and returns the center of the step window with the lowest RMS; the
/// earliest window wins ties. A segment no longer than the search window is
/// cut at its exact midpoint.
fn find_quiet_cut(segment: &AudioBuffer, search_range_ms: u64) -> u64 {
    let length = segment.duration_ms();
    if length <= search_range_ms {
        return length / 2;
    }

    let mid = length / 2;
    let search_start = mid.saturating_sub(search_range_ms / 2);
    let search_end = (mid + search_range_ms / 2).min(length);

    let mut min_rms = f32::INFINITY;
    let mut best_pos = mid;
    let mut i = search_start;
    while i < search_end {
        let rms = segment.slice_ms(i, i + SEARCH_STEP_MS).rms();
        if rms < min_rms {
            min_rms = rms;
            best_pos = i + SEARCH_STEP_MS / 2;
        }
        i += SEARCH_STEP_MS;
    }

    best_pos
}
