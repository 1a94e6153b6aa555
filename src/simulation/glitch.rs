use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::BUFFER_CAPACITY;
use crate::error::{PackError, Result};
use crate::source::{BlockSource, IndexedBlock};

/// Faults injected into an otherwise well-formed block stream
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    pub seed: Option<u64>,
    /// Probability of replacing a sample's index with an out-of-range one
    pub overflow_probability: Option<f64>,
    /// Probability of dropping a sample, leaving a gap in its frame
    pub dropout_probability: Option<f64>,
    /// Standard deviation of Gaussian noise added to every value
    pub value_noise_std: Option<f64>,
}

impl GlitchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_overflow(mut self, probability: f64) -> Self {
        self.overflow_probability = Some(probability);
        self
    }

    pub fn with_dropout(mut self, probability: f64) -> Self {
        self.dropout_probability = Some(probability);
        self
    }

    pub fn with_value_noise(mut self, std_dev: f64) -> Self {
        self.value_noise_std = Some(std_dev);
        self
    }
}

/// Counts of injected faults
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlitchStats {
    pub overflows: u64,
    pub dropouts: u64,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn check_probability(name: &str, p: Option<f64>) -> Result<f64> {
    match p {
        None => Ok(0.0),
        Some(p) if (0.0..=1.0).contains(&p) => Ok(p),
        Some(p) => Err(PackError::Config(format!(
            "{} must be in 0..=1, got {}",
            name, p
        ))),
    }
}

/// Wraps a block source and corrupts its output according to a
/// [`GlitchConfig`]
pub struct GlitchSource<S> {
    inner: S,
    rng: ChaCha8Rng,
    overflow_probability: f64,
    dropout_probability: f64,
    noise: Option<Normal<f64>>,
    stats: GlitchStats,
}

impl<S: BlockSource> GlitchSource<S> {
    pub fn new(inner: S, config: &GlitchConfig) -> Result<Self> {
        let noise = match config.value_noise_std {
            Some(std_dev) => Some(
                Normal::new(0.0, std_dev).map_err(|e| PackError::Config(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            inner,
            rng: create_rng(config.seed),
            overflow_probability: check_probability(
                "overflow_probability",
                config.overflow_probability,
            )?,
            dropout_probability: check_probability(
                "dropout_probability",
                config.dropout_probability,
            )?,
            noise,
            stats: GlitchStats::default(),
        })
    }

    pub fn stats(&self) -> GlitchStats {
        self.stats
    }

    fn corrupt(&mut self, block: IndexedBlock) -> IndexedBlock {
        let mut out = IndexedBlock::with_capacity(block.len());
        for (&value, &index) in block.values.iter().zip(&block.indices) {
            if self.rng.random::<f64>() < self.dropout_probability {
                self.stats.dropouts += 1;
                continue;
            }

            let index = if self.rng.random::<f64>() < self.overflow_probability {
                self.stats.overflows += 1;
                (BUFFER_CAPACITY + self.rng.random_range(0..BUFFER_CAPACITY)) as f64
            } else {
                index
            };

            let value = match &self.noise {
                Some(normal) => value + normal.sample(&mut self.rng),
                None => value,
            };

            out.push(value, index);
        }
        out
    }
}

impl<S: BlockSource> BlockSource for GlitchSource<S> {
    fn next_block(&mut self) -> Result<Option<IndexedBlock>> {
        match self.inner.next_block()? {
            Some(block) => Ok(Some(self.corrupt(block))),
            None => Ok(None),
        }
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::source::SyntheticSource;

    fn source() -> SyntheticSource {
        let config = SourceConfig {
            frame_length: 256,
            block_size: 64,
            ..SourceConfig::default()
        };
        SyntheticSource::new(&config, 8).unwrap()
    }

    fn drain<S: BlockSource>(source: &mut S) -> IndexedBlock {
        let mut all = IndexedBlock::default();
        while let Some(block) = source.next_block().unwrap() {
            all.values.extend(block.values);
            all.indices.extend(block.indices);
        }
        all
    }

    #[test]
    fn test_no_glitches_is_passthrough() {
        let clean = drain(&mut source());
        let mut glitchy = GlitchSource::new(source(), &GlitchConfig::default()).unwrap();
        assert_eq!(drain(&mut glitchy), clean);
        assert_eq!(glitchy.stats(), GlitchStats::default());
    }

    #[test]
    fn test_overflow_indices_out_of_range() {
        let config = GlitchConfig::default().with_seed(7).with_overflow(0.1);
        let mut glitchy = GlitchSource::new(source(), &config).unwrap();
        let all = drain(&mut glitchy);

        let out_of_range = all
            .indices
            .iter()
            .filter(|&&i| i >= BUFFER_CAPACITY as f64)
            .count() as u64;
        assert!(out_of_range > 0);
        assert_eq!(out_of_range, glitchy.stats().overflows);
    }

    #[test]
    fn test_dropout_removes_samples() {
        let clean_len = drain(&mut source()).len() as u64;
        let config = GlitchConfig::default().with_seed(3).with_dropout(0.05);
        let mut glitchy = GlitchSource::new(source(), &config).unwrap();
        let all = drain(&mut glitchy);

        assert!(glitchy.stats().dropouts > 0);
        assert_eq!(all.len() as u64 + glitchy.stats().dropouts, clean_len);
    }

    #[test]
    fn test_seeded_reproducibility() {
        let config = GlitchConfig::default()
            .with_seed(12345)
            .with_overflow(0.02)
            .with_value_noise(1.0);
        let first = drain(&mut GlitchSource::new(source(), &config).unwrap());
        let second = drain(&mut GlitchSource::new(source(), &config).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_probability() {
        let config = GlitchConfig::default().with_overflow(1.5);
        assert!(GlitchSource::new(source(), &config).is_err());
    }
}
