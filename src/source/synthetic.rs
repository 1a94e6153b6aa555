use super::{BlockSource, IndexedBlock};
use crate::config::SourceConfig;
use crate::constants::{BUFFER_CAPACITY, DEFAULT_PEAK_THRESHOLD};
use crate::error::{PackError, Result};

/// Bin spacing of the peaks produced by [`spike_train`]
const SPIKE_SPACING: usize = 64;

/// Value shape: `(bin, frame_number) -> value`
pub type FrameShape = Box<dyn Fn(usize, u64) -> f64 + Send>;

/// Default frame shape: a low ramp with a spike above the default peak
/// threshold every 64 bins, shifted by one bin per frame
pub fn spike_train(bin: usize, frame: u64) -> f64 {
    let shift = (frame % SPIKE_SPACING as u64) as usize;
    if (bin + SPIKE_SPACING - shift) % SPIKE_SPACING == 0 {
        DEFAULT_PEAK_THRESHOLD * 1.5
    } else {
        (bin % 10) as f64
    }
}

/// Stream of well-formed frames, each indexed `0..frame_length`
///
/// After the requested number of frames a single index-0 sample is emitted
/// so that the last frame is closed and handed to the consumer.
pub struct SyntheticSource {
    shape: FrameShape,
    frame_length: usize,
    block_size: usize,
    sample_rate: u32,
    frames: u64,
    frame: u64,
    bin: usize,
    finished: bool,
}

impl SyntheticSource {
    pub fn new(config: &SourceConfig, frames: u64) -> Result<Self> {
        Self::with_shape(config, frames, Box::new(spike_train))
    }

    pub fn with_shape(config: &SourceConfig, frames: u64, shape: FrameShape) -> Result<Self> {
        if config.frame_length == 0 || config.frame_length > BUFFER_CAPACITY {
            return Err(PackError::Source(format!(
                "frame length {} outside 1..={}",
                config.frame_length, BUFFER_CAPACITY
            )));
        }
        if config.block_size == 0 {
            return Err(PackError::Source("block size must be positive".into()));
        }

        Ok(Self {
            shape,
            frame_length: config.frame_length,
            block_size: config.block_size,
            sample_rate: config.sample_rate,
            frames,
            frame: 0,
            bin: 0,
            finished: false,
        })
    }
}

impl BlockSource for SyntheticSource {
    fn next_block(&mut self) -> Result<Option<IndexedBlock>> {
        if self.finished {
            return Ok(None);
        }

        let mut block = IndexedBlock::with_capacity(self.block_size);
        while block.len() < self.block_size {
            if self.frame >= self.frames {
                block.push(0.0, 0.0);
                self.finished = true;
                break;
            }

            block.push((self.shape)(self.bin, self.frame), self.bin as f64);
            self.bin += 1;
            if self.bin == self.frame_length {
                self.bin = 0;
                self.frame += 1;
            }
        }

        Ok(Some(block))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frame_length: usize, block_size: usize) -> SourceConfig {
        SourceConfig {
            frame_length,
            block_size,
            ..SourceConfig::default()
        }
    }

    fn drain(source: &mut SyntheticSource) -> IndexedBlock {
        let mut all = IndexedBlock::default();
        while let Some(block) = source.next_block().unwrap() {
            all.values.extend(block.values);
            all.indices.extend(block.indices);
        }
        all
    }

    #[test]
    fn test_indices_ramp_per_frame_and_close() {
        let mut source = SyntheticSource::new(&config(4, 3), 2).unwrap();
        let all = drain(&mut source);
        assert_eq!(all.indices, vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_blocks_respect_block_size() {
        let mut source = SyntheticSource::new(&config(10, 4), 1).unwrap();
        let lengths: Vec<usize> = std::iter::from_fn(|| source.next_block().unwrap())
            .map(|b| b.len())
            .collect();
        assert_eq!(lengths, vec![4, 4, 3]);
    }

    #[test]
    fn test_custom_shape() {
        let mut source =
            SyntheticSource::with_shape(&config(3, 8), 1, Box::new(|bin, _| bin as f64 * 2.0))
                .unwrap();
        let all = drain(&mut source);
        assert_eq!(all.values, vec![0.0, 2.0, 4.0, 0.0]);
    }

    #[test]
    fn test_spike_train_shifts_per_frame() {
        assert!(spike_train(0, 0) > DEFAULT_PEAK_THRESHOLD);
        assert!(spike_train(64, 0) > DEFAULT_PEAK_THRESHOLD);
        assert!(spike_train(1, 0) < DEFAULT_PEAK_THRESHOLD);
        assert!(spike_train(1, 1) > DEFAULT_PEAK_THRESHOLD);
        assert!(spike_train(0, 1) < DEFAULT_PEAK_THRESHOLD);
    }

    #[test]
    fn test_rejects_oversized_frames() {
        assert!(SyntheticSource::new(&config(BUFFER_CAPACITY + 1, 64), 1).is_err());
        assert!(SyntheticSource::new(&config(0, 64), 1).is_err());
    }
}
