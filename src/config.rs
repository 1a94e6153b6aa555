//! Configuration for frame assembly and presentation.
//!
//! Every section has sensible defaults, so a TOML file only needs to name
//! the values it changes:
//!
//! ```toml
//! [presenter]
//! peak_threshold = 80.0
//! output_length = "full"
//!
//! [trigger]
//! interval = "20hz"
//!
//! [producer]
//! pace = false
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{BUFFER_CAPACITY, DEFAULT_PEAK_THRESHOLD};
use crate::error::{PackError, Result};

/// How much of a presented frame is reported
///
/// `Half` reproduces the long-standing behavior of reporting only the first
/// `size / 2` samples, which keeps output lists small enough for downstream
/// list handling. `Full` reports the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputLength {
    /// First `size / 2` samples (integer division)
    #[default]
    Half,
    /// All `size` samples
    Full,
}

impl OutputLength {
    /// Number of samples reported for a frame of `size` samples
    pub fn apply(self, size: usize) -> usize {
        match self {
            Self::Half => size / 2,
            Self::Full => size,
        }
    }
}

impl fmt::Display for OutputLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Half => write!(f, "half"),
            Self::Full => write!(f, "full"),
        }
    }
}

impl FromStr for OutputLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half" => Ok(Self::Half),
            "full" => Ok(Self::Full),
            other => Err(format!("invalid output length: {}", other)),
        }
    }
}

/// Interval between consumer triggers
///
/// # Parsing formats
/// - `50` - milliseconds (no suffix)
/// - `50ms` - milliseconds
/// - `0.05s` - seconds
/// - `20hz` or `20Hz` - trigger rate
///
/// In TOML the interval may also be a bare number of milliseconds
/// (`interval = 50`).
///
/// # Example
/// ```
/// use framepack::config::TriggerInterval;
///
/// let interval: TriggerInterval = "20hz".parse().unwrap();
/// assert_eq!(interval.as_duration().as_millis(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "IntervalValue")]
pub struct TriggerInterval(Duration);

impl TriggerInterval {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Interval of one trigger period at `hz`
    pub fn from_hz(hz: f64) -> std::result::Result<Self, String> {
        Self::from_secs(1.0 / hz)
    }

    /// Rejects values that do not fit a `Duration` or round down to zero
    fn from_secs(secs: f64) -> std::result::Result<Self, String> {
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(|e| format!("invalid trigger interval: {}", e))?;
        if duration.is_zero() {
            return Err("trigger interval must be positive".to_string());
        }
        Ok(Self(duration))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for TriggerInterval {
    fn default() -> Self {
        Self::from_millis(50)
    }
}

impl fmt::Display for TriggerInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

impl FromStr for TriggerInterval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let parse_positive = |num: &str| -> std::result::Result<f64, String> {
            let value: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid trigger interval: {}", s))?;
            if !value.is_finite() || value <= 0.0 {
                return Err("trigger interval must be positive".to_string());
            }
            Ok(value)
        };

        let lower = s.to_ascii_lowercase();
        if let Some(num) = lower.strip_suffix("hz") {
            return Self::from_hz(parse_positive(num)?);
        }
        if let Some(num) = lower.strip_suffix("ms") {
            return Self::from_secs(parse_positive(num)? / 1000.0);
        }
        if let Some(num) = lower.strip_suffix('s') {
            return Self::from_secs(parse_positive(num)?);
        }
        Self::from_secs(parse_positive(&lower)? / 1000.0)
    }
}

/// Serialized form of a [`TriggerInterval`]: a string in any of the parsing
/// formats, or a number of milliseconds
#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalValue {
    Millis(f64),
    Text(String),
}

impl TryFrom<IntervalValue> for TriggerInterval {
    type Error = String;

    fn try_from(value: IntervalValue) -> std::result::Result<Self, Self::Error> {
        match value {
            IntervalValue::Millis(ms) if ms.is_finite() && ms > 0.0 => {
                Self::from_secs(ms / 1000.0)
            }
            IntervalValue::Millis(ms) => Err(format!("invalid trigger interval: {}", ms)),
            IntervalValue::Text(text) => text.parse(),
        }
    }
}

/// Top-level configuration
///
/// # Example
/// ```
/// use framepack::config::{OutputLength, PackConfig};
///
/// let mut config = PackConfig::default();
/// config.presenter.output_length = OutputLength::Full;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Consumer-side output derivation
    pub presenter: PresenterConfig,
    /// Block source parameters
    pub source: SourceConfig,
    /// Consumer trigger parameters
    pub trigger: TriggerConfig,
    /// Producer thread parameters
    pub producer: ProducerConfig,
}

/// Consumer-side output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// A sample strictly above this value is reported as a peak
    pub peak_threshold: f64,
    /// How much of each frame is reported
    pub output_length: OutputLength,
}

/// Block source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Samples delivered to the producer per activation
    pub block_size: usize,
    /// Nominal sample rate of the block stream in Hz
    pub sample_rate: u32,
    /// Frame length used by the synthetic source
    pub frame_length: usize,
}

/// Consumer trigger configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Time between consumer activations
    pub interval: TriggerInterval,
}

/// Producer thread configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Try to promote the producer thread to real-time priority
    pub realtime_priority: bool,
    /// Deliver blocks at the nominal sample rate instead of as fast as possible
    pub pace: bool,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            realtime_priority: true,
            pace: true,
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            output_length: OutputLength::Half,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            block_size: 64,
            sample_rate: 48000,
            frame_length: 1024,
        }
    }
}

impl PackConfig {
    /// Parse a TOML document; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| PackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.presenter.peak_threshold.is_finite() {
            return Err(PackError::Config("peak_threshold must be finite".into()));
        }
        if self.source.block_size == 0 {
            return Err(PackError::Config("block_size must be positive".into()));
        }
        if u32::try_from(self.source.block_size).is_err() {
            return Err(PackError::Config(format!(
                "block_size must fit in 32 bits, got {}",
                self.source.block_size
            )));
        }
        if self.source.sample_rate == 0 {
            return Err(PackError::Config("sample_rate must be positive".into()));
        }
        if self.source.frame_length == 0 || self.source.frame_length > BUFFER_CAPACITY {
            return Err(PackError::Config(format!(
                "frame_length must be in 1..={}, got {}",
                BUFFER_CAPACITY, self.source.frame_length
            )));
        }
        Ok(())
    }
}
