use super::{Formatter, iso8601_timestamp};

/// Space-separated lists, one line per channel
pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn line<T: ToString>(&self, channel: &str, items: &[T]) -> String {
        let body = items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        if self.verbose {
            format!("{} {} ({}): {}", iso8601_timestamp(), channel, items.len(), body)
        } else if body.is_empty() {
            channel.to_string()
        } else {
            format!("{} {}", channel, body)
        }
    }
}

impl Formatter for TextFormatter {
    fn format_peaks(&self, peaks: &[usize]) -> String {
        self.line("peaks", peaks)
    }

    fn format_raw(&self, raw: &[f64]) -> String {
        self.line("raw", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_peaks(&[3, 17]), "peaks 3 17");
        assert_eq!(formatter.format_peaks(&[]), "peaks");
        assert_eq!(formatter.format_raw(&[5.0, 12.5]), "raw 5 12.5");
    }

    #[test]
    fn test_verbose_lines_carry_count() {
        let formatter = TextFormatter::new(true);
        let line = formatter.format_raw(&[1.0, 2.0]);
        assert!(line.ends_with("raw (2): 1 2"), "unexpected line: {line}");
    }
}
