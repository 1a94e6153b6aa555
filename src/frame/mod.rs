pub mod assembler;
pub mod overflow;
pub mod presenter;

use std::sync::Arc;

use crate::config::PresenterConfig;
use crate::exchange::BufferExchange;

pub use assembler::FrameAssembler;
pub use overflow::OverflowFlag;
pub use presenter::{FramePresenter, Presentation};

/// Create a connected producer/consumer pair over a fresh triple buffer
///
/// Neither half can be cloned, so the exchange always has exactly one
/// writer and one reader.
///
/// # Example
/// ```
/// use framepack::config::PresenterConfig;
/// use framepack::frame::frame_channel;
///
/// let (mut assembler, mut presenter) = frame_channel(&PresenterConfig::default());
/// assembler.process(&[5.0, 12.0, 101.0, 3.0], &[0.0, 1.0, 2.0, 3.0]);
/// assembler.process(&[0.0], &[0.0]);
///
/// let presentation = presenter.present();
/// assert_eq!(presentation.raw, &[5.0, 12.0]);
/// assert!(presentation.peaks.is_empty());
/// ```
pub fn frame_channel(config: &PresenterConfig) -> (FrameAssembler, FramePresenter) {
    let exchange = Arc::new(BufferExchange::new());
    let overflow = Arc::new(OverflowFlag::new());
    let assembler = FrameAssembler::new(exchange.clone(), overflow.clone());
    let presenter = FramePresenter::new(exchange, overflow, config);
    (assembler, presenter)
}
