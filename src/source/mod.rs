mod synthetic;
mod wav;

use crate::error::Result;

pub use synthetic::{SyntheticSource, spike_train};
pub use wav::WavFileSource;

/// One producer activation worth of paired samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedBlock {
    pub values: Vec<f64>,
    pub indices: Vec<f64>,
}

impl IndexedBlock {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64, index: f64) {
        self.values.push(value);
        self.indices.push(index);
    }

    pub fn len(&self) -> usize {
        self.values.len().min(self.indices.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait BlockSource: Send {
    /// Next block, or `None` once the stream is exhausted
    fn next_block(&mut self) -> Result<Option<IndexedBlock>>;
    fn sample_rate(&self) -> u32;
}

impl<S: BlockSource + ?Sized> BlockSource for Box<S> {
    fn next_block(&mut self) -> Result<Option<IndexedBlock>> {
        (**self).next_block()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}
