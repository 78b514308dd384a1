use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::error::{ChopError, Result};

use super::AudioBuffer;

/// Decode a WAV file into an [`AudioBuffer`], preserving its native sample
/// rate and channel count. 16/24/32-bit integer and 32-bit float samples are
/// accepted.
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let reader = WavReader::open(path).map_err(|e| {
        ChopError::InvalidAudioInput(format!("failed to open {}: {e}", path.display()))
    })?;

    let spec = reader.spec();
    debug!(
        "Reading {}: {} Hz, {} channel(s), {} bits",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, bits @ (24 | 32)) => {
            let scale = ((1i64 << (bits - 1)) - 1) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (format, bits) => {
            return Err(ChopError::InvalidAudioInput(format!(
                "unsupported sample format in {}: {bits}-bit {format:?}",
                path.display()
            )));
        }
    };

    Ok(AudioBuffer::new(samples, spec.sample_rate, spec.channels))
}

/// Encode a buffer as 16-bit PCM WAV at its native rate and channel count.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    Ok(())
}
