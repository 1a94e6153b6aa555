use crate::constants::BUFFER_CAPACITY;

/// Fixed-capacity sample storage for one frame
///
/// `size` is maintained by the writer and is not derived from the contents.
/// Positions beyond `size` keep whatever was last written there (or zero).
pub struct SampleBuffer {
    data: Box<[f64]>,
    size: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            data: vec![0.0; BUFFER_CAPACITY].into_boxed_slice(),
            size: 0,
        }
    }

    /// Write `value` at `position`
    ///
    /// Returns `false` and leaves the buffer untouched if `position` is
    /// outside the capacity.
    #[inline]
    pub fn set(&mut self, position: usize, value: f64) -> bool {
        match self.data.get_mut(position) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Commit the logical frame size, clamped to the capacity
    #[inline]
    pub fn set_size(&mut self, size: usize) {
        self.size = size.min(BUFFER_CAPACITY);
    }

    /// Full backing storage, including positions past `size`
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Samples that belong to the current frame
    pub fn valid(&self) -> &[f64] {
        &self.data[..self.size]
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Zero the size and the storage
    pub fn reset(&mut self) {
        self.data.fill(0.0);
        self.size = 0;
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
