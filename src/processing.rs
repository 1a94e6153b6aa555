use std::thread;
use std::time::{Duration, Instant};

use audio_thread_priority::RtPriorityHandle;
use crossbeam_channel::select;
use rolling_stats::Stats;
use serde::Serialize;

use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::frame::{FrameAssembler, frame_channel};
use crate::output::FrameSink;
use crate::source::BlockSource;

#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl TimingSummary {
    fn from_stats(stats: &Stats<f64>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Totals for one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub blocks: u64,
    pub samples: u64,
    pub frames_closed: u64,
    pub sequence_violations: u64,
    pub presentations: u64,
    pub overflow_reports: u64,
    /// Time spent inside `FrameAssembler::process` per block, in microseconds
    pub process_time_us: Option<TimingSummary>,
    pub elapsed_secs: f64,
}

struct ProducerReport {
    blocks: u64,
    samples: u64,
    frames_closed: u64,
    sequence_violations: u64,
    process_time: Stats<f64>,
}

fn promote_producer_thread(block_size: usize, sample_rate: u32) -> Option<RtPriorityHandle> {
    let frames = u32::try_from(block_size).unwrap_or(u32::MAX);
    match audio_thread_priority::promote_current_thread_to_real_time(frames, sample_rate) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Could not set real-time priority: {}", e);
            None
        }
    }
}

fn run_producer(
    mut source: Box<dyn BlockSource>,
    mut assembler: FrameAssembler,
    config: &PackConfig,
) -> Result<ProducerReport> {
    let sample_rate = source.sample_rate();
    let _rt_handle = if config.producer.realtime_priority {
        promote_producer_thread(config.source.block_size, sample_rate)
    } else {
        None
    };
    let pace = config.producer.pace && sample_rate > 0;

    let mut process_time: Stats<f64> = Stats::new();
    let mut blocks = 0u64;
    let mut samples = 0u64;
    let mut deadline = Instant::now();

    while let Some(block) = source.next_block()? {
        let start = Instant::now();
        assembler.process(&block.values, &block.indices);
        process_time.update(start.elapsed().as_secs_f64() * 1e6);

        blocks += 1;
        samples += block.len() as u64;

        if pace {
            deadline += Duration::from_secs_f64(block.len() as f64 / sample_rate as f64);
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    }

    Ok(ProducerReport {
        blocks,
        samples,
        frames_closed: assembler.frames_closed(),
        sequence_violations: assembler.sequence_violations(),
        process_time,
    })
}

/// Drive `source` through a producer thread while presenting frames to
/// `sink` on the calling thread
///
/// The consumer is triggered every `config.trigger.interval` until the
/// source is exhausted, then once more so the last finished frame is
/// delivered.
pub fn run_pipeline<K: FrameSink + ?Sized>(
    source: Box<dyn BlockSource>,
    config: &PackConfig,
    sink: &mut K,
) -> Result<RunSummary> {
    config.validate()?;

    let started = Instant::now();
    let (assembler, mut presenter) = frame_channel(&config.presenter);
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

    log::info!(
        "Starting pipeline: block size {}, trigger every {}, output length {}",
        config.source.block_size,
        config.trigger.interval,
        config.presenter.output_length
    );

    let producer_config = config.clone();
    let producer = thread::Builder::new()
        .name("framepack-producer".into())
        .spawn(move || {
            // Dropped on return, which wakes the consumer loop.
            let _done = done_tx;
            run_producer(source, assembler, &producer_config)
        })
        .map_err(|e| PackError::Thread(e.to_string()))?;

    let ticker = crossbeam_channel::tick(config.trigger.interval.as_duration());
    let mut overflow_reports = 0u64;

    let mut producing = true;
    while producing {
        select! {
            recv(ticker) -> _ => {
                if presenter.present_to(&mut *sink) {
                    overflow_reports += 1;
                }
            }
            recv(done_rx) -> _ => producing = false,
        }
    }

    let report = producer
        .join()
        .map_err(|_| PackError::Thread("producer thread panicked".into()))??;

    if presenter.present_to(&mut *sink) {
        overflow_reports += 1;
    }

    let summary = RunSummary {
        blocks: report.blocks,
        samples: report.samples,
        frames_closed: report.frames_closed,
        sequence_violations: report.sequence_violations,
        presentations: presenter.presentations(),
        overflow_reports,
        process_time_us: TimingSummary::from_stats(&report.process_time),
        elapsed_secs: started.elapsed().as_secs_f64(),
    };

    log::info!(
        "Pipeline finished: {} blocks, {} frames, {} presentations, {} sequencing violations",
        summary.blocks,
        summary.frames_closed,
        summary.presentations,
        summary.sequence_violations
    );

    Ok(summary)
}
