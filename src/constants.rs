//! Fixed sizes and thresholds for frame assembly
//!
//! The buffer capacity is a compile-time constant: slots are allocated once
//! and never resized, so the producer never allocates.

/// Number of samples each buffer slot can hold.
/// Indices at or above this value are treated as overflow and dropped.
pub const BUFFER_CAPACITY: usize = 4096;

/// Default value a sample must exceed to be reported as a peak.
pub const DEFAULT_PEAK_THRESHOLD: f64 = 100.0;

/// Number of buffer slots rotated between the write, read and copy roles.
pub const SLOT_COUNT: usize = 3;
