use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::WavReader;

use super::{BlockSource, IndexedBlock};
use crate::error::{PackError, Result};

/// Two-channel WAV file replayed as indexed blocks
///
/// Channel 0 carries the values and channel 1 the indices, matching the
/// layout written by [`crate::wav::save_indexed_wav`]. Integer files are
/// read verbatim (no normalization) so integer indices survive.
pub struct WavFileSource {
    values: Vec<f64>,
    indices: Vec<f64>,
    position: usize,
    block_size: usize,
    sample_rate: u32,
}

impl WavFileSource {
    pub fn new<P: AsRef<Path>>(path: P, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(PackError::Source("block size must be positive".into()));
        }

        let reader = WavReader::open(path.as_ref())?;
        let spec = reader.spec();

        if spec.channels != 2 {
            return Err(PackError::Source(format!(
                "Expected 2-channel (value, index) WAV file, got {} channels",
                spec.channels
            )));
        }

        let interleaved = Self::read_samples(reader, &spec)?;
        let (values, indices): (Vec<f64>, Vec<f64>) = interleaved
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .unzip();

        Ok(Self {
            values,
            indices,
            position: 0,
            block_size,
            sample_rate: spec.sample_rate,
        })
    }

    fn read_samples(
        mut reader: WavReader<BufReader<File>>,
        spec: &hound::WavSpec,
    ) -> Result<Vec<f64>> {
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => reader
                .samples::<i32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        };
        Ok(samples)
    }

    /// Number of (value, index) pairs in the file
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BlockSource for WavFileSource {
    fn next_block(&mut self) -> Result<Option<IndexedBlock>> {
        if self.position >= self.values.len() {
            return Ok(None);
        }

        let end = (self.position + self.block_size).min(self.values.len());
        let block = IndexedBlock {
            values: self.values[self.position..end].to_vec(),
            indices: self.indices[self.position..end].to_vec(),
        };
        self.position = end;

        Ok(Some(block))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
