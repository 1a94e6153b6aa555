//! Triple-buffered frame handoff between a real-time producer and an
//! on-demand consumer.
//!
//! The producer ([`FrameAssembler`]) receives blocks of (value, index)
//! pairs and assembles them into frames that start at index 0. The consumer
//! ([`FramePresenter`]) picks up the most recently finished frame whenever
//! it is triggered and derives a peak list and a raw value list from it.
//! The two sides exchange buffers through three slots whose roles rotate
//! with single atomic swaps, so neither side ever copies a frame or waits
//! on the other.

pub mod config;
pub mod constants;
pub mod error;
pub mod exchange;
pub mod frame;
pub mod output;
pub mod processing;
pub mod source;
pub mod wav;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(test)]
mod test_utils;

pub use config::PackConfig;
pub use error::{PackError, Result};
pub use frame::{FrameAssembler, FramePresenter, Presentation, frame_channel};
pub use wav::save_indexed_wav;
