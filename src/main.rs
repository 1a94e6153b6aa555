use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use framepack::config::{OutputLength, PackConfig, TriggerInterval};
use framepack::output::{FormatterSink, OutputFormat, create_formatter};
use framepack::processing::{RunSummary, run_pipeline};
use framepack::source::{BlockSource, SyntheticSource, WavFileSource};

#[derive(Parser, Debug)]
#[command(name = "framepack")]
#[command(
    about = "Assemble indexed sample frames and present them on a trigger",
    long_about = None
)]
struct Args {
    /// 2-channel WAV file (channel 0 = values, channel 1 = indices).
    /// Synthetic frames are generated when omitted.
    #[arg(short = 'w', long)]
    wav: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Consumer trigger interval (e.g., "50ms", "0.1s", "20hz")
    #[arg(short, long)]
    trigger: Option<TriggerInterval>,

    /// Reported frame length: half, full
    #[arg(long, value_enum)]
    output_length: Option<OutputLength>,

    /// Peak threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Samples per producer block
    #[arg(long)]
    block_size: Option<usize>,

    /// Number of synthetic frames to generate
    #[arg(long, default_value_t = 100)]
    frames: u64,

    /// Feed blocks as fast as possible instead of at the sample rate
    #[arg(long)]
    no_pace: bool,

    /// Do not request real-time priority for the producer thread
    #[arg(long)]
    no_rt: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;

    let source: Box<dyn BlockSource> = match &args.wav {
        Some(path) => Box::new(
            WavFileSource::new(path, config.source.block_size)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        None => Box::new(
            SyntheticSource::new(&config.source, args.frames)
                .context("Failed to create synthetic source")?,
        ),
    };

    let stdout = io::stdout();
    let formatter = create_formatter(args.format, args.verbose > 0);
    let mut sink = FormatterSink::new(formatter, stdout.lock());

    let summary = run_pipeline(source, &config, &mut sink).context("Pipeline failed")?;
    print_summary(&summary);

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<PackConfig> {
    let mut config = match &args.config {
        Some(path) => PackConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PackConfig::default(),
    };

    if let Some(trigger) = args.trigger {
        config.trigger.interval = trigger;
    }
    if let Some(output_length) = args.output_length {
        config.presenter.output_length = output_length;
    }
    if let Some(threshold) = args.threshold {
        config.presenter.peak_threshold = threshold;
    }
    if let Some(block_size) = args.block_size {
        config.source.block_size = block_size;
    }
    if args.no_pace {
        config.producer.pace = false;
    }
    if args.no_rt {
        config.producer.realtime_priority = false;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("=== framepack summary ===");
    eprintln!("Blocks: {} ({} samples)", summary.blocks, summary.samples);
    eprintln!("Frames closed: {}", summary.frames_closed);
    eprintln!("Presentations: {}", summary.presentations);
    eprintln!("Sequencing violations: {}", summary.sequence_violations);
    eprintln!("Overflow reports: {}", summary.overflow_reports);
    if let Some(timing) = &summary.process_time_us {
        eprintln!(
            "Process time: mean {:.2} us, max {:.2} us (std {:.2})",
            timing.mean, timing.max, timing.std_dev
        );
    }
    eprintln!("Elapsed: {:.2} s", summary.elapsed_secs);
}
