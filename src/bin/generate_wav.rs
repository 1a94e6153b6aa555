use anyhow::{Context, Result};
use clap::Parser;
use framepack::config::SourceConfig;
use framepack::save_indexed_wav;
use framepack::simulation::{GlitchConfig, GlitchSource};
use framepack::source::{BlockSource, SyntheticSource};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate 2-channel indexed-frame WAV files with optional injected faults")]
struct Args {
    /// TOML configuration file with [source] and [glitch] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "data/synthetic/frames.wav")]
    output: PathBuf,

    /// Number of frames
    #[arg(short, long, default_value_t = 100)]
    frames: u64,

    /// Samples per frame (CLI override)
    #[arg(long)]
    frame_length: Option<usize>,

    /// Sample rate in Hz (CLI override)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Seed for reproducibility (CLI override)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Per-sample probability of an out-of-range index (CLI override)
    #[arg(long)]
    overflow: Option<f64>,

    /// Per-sample probability of a dropped sample (CLI override)
    #[arg(long)]
    dropout: Option<f64>,

    /// Standard deviation of value noise (CLI override)
    #[arg(long)]
    noise: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TomlConfig {
    source: SourceConfig,
    glitch: GlitchConfig,
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn apply_overrides(mut toml: TomlConfig, args: &Args) -> TomlConfig {
    if let Some(frame_length) = args.frame_length {
        toml.source.frame_length = frame_length;
    }
    if let Some(sample_rate) = args.sample_rate {
        toml.source.sample_rate = sample_rate;
    }
    if let Some(seed) = args.seed {
        toml.glitch = toml.glitch.with_seed(seed);
    }
    if let Some(p) = args.overflow {
        toml.glitch = toml.glitch.with_overflow(p);
    }
    if let Some(p) = args.dropout {
        toml.glitch = toml.glitch.with_dropout(p);
    }
    if let Some(std_dev) = args.noise {
        toml.glitch = toml.glitch.with_value_noise(std_dev);
    }
    toml
}

fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };
    let config = apply_overrides(toml_config, &args);

    let synthetic =
        SyntheticSource::new(&config.source, args.frames).context("Invalid source config")?;
    let mut source =
        GlitchSource::new(synthetic, &config.glitch).context("Invalid glitch config")?;

    let mut values = Vec::new();
    let mut indices = Vec::new();
    while let Some(block) = source.next_block()? {
        values.extend(block.values);
        indices.extend(block.indices);
    }

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    save_indexed_wav(&args.output, &values, &indices, source.sample_rate())
        .context("Failed to write WAV file")?;

    let stats = source.stats();
    eprintln!(
        "Wrote {} samples ({} frames of {}) to {}",
        values.len(),
        args.frames,
        config.source.frame_length,
        args.output.display()
    );
    eprintln!(
        "Injected faults: {} overflows, {} dropouts",
        stats.overflows, stats.dropouts
    );
    Ok(())
}
