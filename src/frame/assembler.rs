use std::sync::Arc;

use crate::constants::BUFFER_CAPACITY;
use crate::exchange::BufferExchange;
use crate::frame::OverflowFlag;

/// Producer half: writes indexed samples into the write slot
///
/// A frame is delimited by its index stream alone: index 0 closes the frame
/// in progress, hands it to the read slot, and starts a new one. Within a
/// frame indices are expected to count up from 0 without gaps or repeats.
///
/// `process` does not allocate and never waits on the consumer.
pub struct FrameAssembler {
    exchange: Arc<BufferExchange>,
    overflow: Arc<OverflowFlag>,
    frames_closed: u64,
    sequence_violations: u64,
}

impl FrameAssembler {
    pub(crate) fn new(exchange: Arc<BufferExchange>, overflow: Arc<OverflowFlag>) -> Self {
        Self {
            exchange,
            overflow,
            frames_closed: 0,
            sequence_violations: 0,
        }
    }

    /// Consume one block of paired samples
    ///
    /// `values[i]` is written at position `indices[i]` (truncated toward
    /// zero). Indices outside `0..BUFFER_CAPACITY` raise the overflow flag
    /// and the sample is dropped. An index that differs from the expected
    /// running count is logged and written anyway.
    ///
    /// # Arguments
    /// * `values` - Sample values
    /// * `indices` - Position of each value within its frame
    pub fn process(&mut self, values: &[f64], indices: &[f64]) {
        if values.len() != indices.len() {
            log::warn!(
                "Mismatched block lengths: {} values, {} indices",
                values.len(),
                indices.len()
            );
        }

        let mut slot = self.exchange.roles().write;
        let mut buffer = self.exchange.slot(slot);
        let mut running = buffer.size();

        for (&value, &index) in values.iter().zip(indices) {
            let Some(position) = slot_position(index) else {
                self.overflow.raise();
                continue;
            };

            if position == 0 {
                buffer.set_size(running);
                drop(buffer);
                slot = self.exchange.swap_write_read();
                buffer = self.exchange.slot(slot);
                running = 0;
                self.frames_closed += 1;
                log::trace!("Frame closed, now writing {}", slot);
            }

            buffer.set(position, value);

            if position != running {
                self.sequence_violations += 1;
                log::warn!(
                    "Frame sequencing violation: expected index {}, got {}",
                    running,
                    position
                );
            }
            running = position + 1;
        }

        buffer.set_size(running);
    }

    /// Number of frame boundaries (index 0) seen so far
    pub fn frames_closed(&self) -> u64 {
        self.frames_closed
    }

    /// Number of out-of-sequence indices seen so far
    pub fn sequence_violations(&self) -> u64 {
        self.sequence_violations
    }

    /// Whether an overflow is waiting to be reported by the consumer
    pub fn overflow_pending(&self) -> bool {
        self.overflow.is_raised()
    }
}

/// Map a raw index to a buffer position
///
/// The cast truncates toward zero and saturates, so negative indices map
/// below zero and fail the conversion. NaN maps to 0.
#[inline]
fn slot_position(index: f64) -> Option<usize> {
    usize::try_from(index as i64)
        .ok()
        .filter(|&position| position < BUFFER_CAPACITY)
}
