use std::path::Path;

use hound::{WavSpec, WavWriter};

/// Write paired samples as a 2-channel float WAV: channel 0 values,
/// channel 1 indices
///
/// Indices are stored as `f32`, which is exact for every valid buffer
/// position.
pub fn save_indexed_wav<P: AsRef<Path>>(
    path: P,
    values: &[f64],
    indices: &[f64],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for (&value, &index) in values.iter().zip(indices) {
        writer.write_sample(value as f32)?;
        writer.write_sample(index as f32)?;
    }

    writer.finalize()?;
    Ok(())
}
