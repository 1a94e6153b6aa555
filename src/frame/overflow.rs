use std::sync::atomic::{AtomicBool, Ordering};

/// Sticky out-of-range warning shared by the producer and the consumer
///
/// The producer raises it any number of times; the consumer observes and
/// clears it in a single exchange, so a raise that races with the clear is
/// either reported now or left pending for the next activation.
#[derive(Debug, Default)]
pub struct OverflowFlag(AtomicBool);

impl OverflowFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}
