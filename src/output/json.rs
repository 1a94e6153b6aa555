use serde::Serialize;

use super::{Formatter, iso8601_timestamp};

/// One JSON object per line
pub struct JsonFormatter;

#[derive(Serialize)]
struct Record<'a, T> {
    ts: String,
    channel: &'a str,
    values: &'a [T],
}

impl JsonFormatter {
    fn record<T: Serialize>(channel: &str, values: &[T]) -> String {
        let record = Record {
            ts: iso8601_timestamp(),
            channel,
            values,
        };
        serde_json::to_string(&record).unwrap_or_else(|e| {
            log::warn!("Could not serialize {} record: {}", channel, e);
            String::new()
        })
    }
}

impl Formatter for JsonFormatter {
    fn format_peaks(&self, peaks: &[usize]) -> String {
        Self::record("peaks", peaks)
    }

    fn format_raw(&self, raw: &[f64]) -> String {
        Self::record("raw", raw)
    }
}
