use std::sync::Arc;

use crate::config::PresenterConfig;
use crate::constants::BUFFER_CAPACITY;
use crate::exchange::{BufferExchange, Roles, SampleBuffer};
use crate::frame::OverflowFlag;
use crate::output::FrameSink;

/// Output derived from one consumer activation
///
/// Borrows the presenter, so copy-slot contents cannot be held past the
/// next activation.
#[derive(Debug, Clone, Copy)]
pub struct Presentation<'a> {
    /// Ascending positions whose value exceeds the peak threshold
    pub peaks: &'a [usize],
    /// Leading samples of the frame
    pub raw: &'a [f64],
    /// Logical size of the presented frame
    pub frame_size: usize,
    /// Whether a frame finished since the previous activation was taken;
    /// otherwise the previous frame is presented again
    pub new_frame: bool,
    /// Whether an overflow warning was issued by this activation
    pub overflow_reported: bool,
}

/// Consumer half: picks up the latest finished frame and derives outputs
pub struct FramePresenter {
    exchange: Arc<BufferExchange>,
    overflow: Arc<OverflowFlag>,
    config: PresenterConfig,
    peaks: Vec<usize>,
    raw: Vec<f64>,
    presentations: u64,
}

impl FramePresenter {
    pub(crate) fn new(
        exchange: Arc<BufferExchange>,
        overflow: Arc<OverflowFlag>,
        config: &PresenterConfig,
    ) -> Self {
        Self {
            exchange,
            overflow,
            config: config.clone(),
            peaks: Vec::with_capacity(BUFFER_CAPACITY),
            raw: Vec::with_capacity(BUFFER_CAPACITY),
            presentations: 0,
        }
    }

    /// Take the most recently finished frame and derive the peak and raw
    /// sequences from it
    ///
    /// If no frame was finished since the last call, the copy slot is kept
    /// and the same sequences are produced again.
    pub fn present(&mut self) -> Presentation<'_> {
        let overflow_reported = self.overflow.take();
        if overflow_reported {
            log::warn!(
                "Frame buffer overflow: indices outside 0..{} were dropped",
                BUFFER_CAPACITY
            );
        }

        let taken = self.exchange.swap_read_copy();
        let new_frame = taken.is_some();
        // Only this side ever moves the copy binding.
        let slot = taken.unwrap_or_else(|| self.exchange.roles().copy);
        let buffer = self.exchange.slot(slot);
        let frame_size = buffer.size();
        let reported = &buffer.valid()[..self.config.output_length.apply(frame_size)];

        let threshold = self.config.peak_threshold;
        self.peaks.clear();
        self.peaks.extend(
            reported
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value > threshold)
                .map(|(position, _)| position),
        );
        self.raw.clear();
        self.raw.extend_from_slice(reported);
        drop(buffer);

        self.presentations += 1;

        Presentation {
            peaks: &self.peaks,
            raw: &self.raw,
            frame_size,
            new_frame,
            overflow_reported,
        }
    }

    /// Present and deliver both sequences to `sink`
    ///
    /// Returns whether an overflow warning was issued.
    pub fn present_to<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let presentation = self.present();
        sink.send_peaks(presentation.peaks);
        sink.send_raw(presentation.raw);
        presentation.overflow_reported
    }

    /// Inspect the current copy slot without taking a new frame
    pub fn inspect_copy<R>(&self, f: impl FnOnce(&SampleBuffer) -> R) -> R {
        let buffer = self.exchange.slot(self.exchange.roles().copy);
        f(&buffer)
    }

    pub fn roles(&self) -> Roles {
        self.exchange.roles()
    }

    pub fn presentations(&self) -> u64 {
        self.presentations
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    pub(crate) fn exchange(&self) -> &BufferExchange {
        &self.exchange
    }
}
