mod json;
mod sinks;
mod text;

use chrono::Utc;

pub use self::json::JsonFormatter;
pub use self::sinks::{ChannelSink, CollectingSink, FormatterSink, FrameReceivers};
pub use self::text::TextFormatter;

/// Destination for the two per-activation output sequences
///
/// The peak and raw channels are independent: a sink may route them to
/// different places.
pub trait FrameSink {
    fn send_peaks(&mut self, peaks: &[usize]);
    fn send_raw(&mut self, raw: &[f64]);
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn send_peaks(&mut self, peaks: &[usize]) {
        (**self).send_peaks(peaks);
    }

    fn send_raw(&mut self, raw: &[f64]) {
        (**self).send_raw(raw);
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub trait Formatter: Send {
    fn format_peaks(&self, peaks: &[usize]) -> String;
    fn format_raw(&self, raw: &[f64]) -> String;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
