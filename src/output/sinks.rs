use std::io::Write;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::{FrameSink, Formatter};

/// Writes each channel as one formatted line
pub struct FormatterSink<W: Write> {
    formatter: Box<dyn Formatter>,
    writer: W,
}

impl<W: Write> FormatterSink<W> {
    pub fn new(formatter: Box<dyn Formatter>, writer: W) -> Self {
        Self { formatter, writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: String) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            log::warn!("Output write failed: {}", e);
        }
    }
}

impl<W: Write> FrameSink for FormatterSink<W> {
    fn send_peaks(&mut self, peaks: &[usize]) {
        let line = self.formatter.format_peaks(peaks);
        self.write_line(line);
    }

    fn send_raw(&mut self, raw: &[f64]) {
        let line = self.formatter.format_raw(raw);
        self.write_line(line);
    }
}

/// Receiving ends of a [`ChannelSink`]
pub struct FrameReceivers {
    pub peaks: Receiver<Vec<usize>>,
    pub raw: Receiver<Vec<f64>>,
}

/// Forwards each sequence into its own bounded channel
///
/// A full channel drops the newest sequence rather than stalling the
/// consumer.
pub struct ChannelSink {
    peaks_tx: Sender<Vec<usize>>,
    raw_tx: Sender<Vec<f64>>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, FrameReceivers) {
        let (peaks_tx, peaks) = crossbeam_channel::bounded(capacity);
        let (raw_tx, raw) = crossbeam_channel::bounded(capacity);
        (Self { peaks_tx, raw_tx }, FrameReceivers { peaks, raw })
    }
}

fn forward<T>(tx: &Sender<T>, item: T, channel: &str) {
    match tx.try_send(item) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => log::debug!("{} channel full, dropping", channel),
        Err(TrySendError::Disconnected(_)) => log::warn!("{} receiver dropped", channel),
    }
}

impl FrameSink for ChannelSink {
    fn send_peaks(&mut self, peaks: &[usize]) {
        forward(&self.peaks_tx, peaks.to_vec(), "peaks");
    }

    fn send_raw(&mut self, raw: &[f64]) {
        forward(&self.raw_tx, raw.to_vec(), "raw");
    }
}

/// Keeps every delivered sequence in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub peaks: Vec<Vec<usize>>,
    pub raw: Vec<Vec<f64>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> usize {
        self.raw.len()
    }
}

impl FrameSink for CollectingSink {
    fn send_peaks(&mut self, peaks: &[usize]) {
        self.peaks.push(peaks.to_vec());
    }

    fn send_raw(&mut self, raw: &[f64]) {
        self.raw.push(raw.to_vec());
    }
}
