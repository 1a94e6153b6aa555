use framepack::config::{OutputLength, PackConfig, TriggerInterval};
use framepack::output::{ChannelSink, CollectingSink, FormatterSink, OutputFormat, create_formatter};
use framepack::processing::run_pipeline;
use framepack::save_indexed_wav;
use framepack::simulation::{GlitchConfig, GlitchSource};
use framepack::source::{SyntheticSource, WavFileSource};

fn fast_config(frame_length: usize, block_size: usize) -> PackConfig {
    let mut config = PackConfig::default();
    config.producer.pace = false;
    config.producer.realtime_priority = false;
    config.source.frame_length = frame_length;
    config.source.block_size = block_size;
    config.trigger.interval = TriggerInterval::from_millis(1);
    config
}

#[test]
fn test_pipeline_with_injected_overflows() {
    let config = fast_config(64, 16);
    let synthetic = SyntheticSource::new(&config.source, 20).unwrap();
    let glitch = GlitchConfig::default().with_seed(42).with_overflow(0.01);
    let source = GlitchSource::new(synthetic, &glitch).unwrap();

    let (mut sink, receivers) = ChannelSink::bounded(4096);
    let summary = run_pipeline(Box::new(source), &config, &mut sink).unwrap();

    assert!(summary.overflow_reports >= 1);
    assert!(summary.overflow_reports <= summary.presentations);

    let raw: Vec<Vec<f64>> = receivers.raw.try_iter().collect();
    let peaks: Vec<Vec<usize>> = receivers.peaks.try_iter().collect();
    assert_eq!(raw.len() as u64, summary.presentations);
    assert_eq!(peaks.len(), raw.len());
    assert!(raw.iter().all(|r| r.len() <= 32));
    for (p, r) in peaks.iter().zip(&raw) {
        assert!(p.iter().all(|&i| i < r.len() && r[i] > 100.0));
    }
}

#[test]
fn test_pipeline_full_output_last_frame() {
    let mut config = fast_config(128, 32);
    config.presenter.output_length = OutputLength::Full;
    let source = SyntheticSource::new(&config.source, 10).unwrap();

    let mut sink = CollectingSink::new();
    let summary = run_pipeline(Box::new(source), &config, &mut sink).unwrap();

    assert_eq!(summary.samples, 10 * 128 + 1);
    assert_eq!(summary.sequence_violations, 0);

    // last frame is frame 9: spikes at bins 9, 73
    let last_peaks = sink.peaks.last().unwrap();
    assert_eq!(last_peaks, &vec![9, 73]);
    assert_eq!(sink.raw.last().unwrap().len(), 128);
}

#[test]
fn test_pipeline_json_lines() {
    let config = fast_config(32, 8);
    let source = SyntheticSource::new(&config.source, 2).unwrap();

    let mut sink = FormatterSink::new(create_formatter(OutputFormat::Json, false), Vec::new());
    let summary = run_pipeline(Box::new(source), &config, &mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len() as u64, 2 * summary.presentations);
    assert_eq!(lines[0]["channel"], "peaks");
    assert_eq!(lines[1]["channel"], "raw");

    let last_raw = &lines[lines.len() - 1]["values"];
    assert_eq!(last_raw.as_array().unwrap().len(), 16);
}

#[test]
fn test_pipeline_replays_wav_file() {
    let config = fast_config(48, 12);
    let path = std::env::temp_dir().join(format!("framepack_pipeline_{}.wav", std::process::id()));

    let mut values = Vec::new();
    let mut indices = Vec::new();
    for frame in 0..4 {
        for bin in 0..48 {
            values.push(if bin == frame { 200.0 } else { 1.0 });
            indices.push(bin as f64);
        }
    }
    values.push(0.0);
    indices.push(0.0);
    save_indexed_wav(&path, &values, &indices, 48000).unwrap();

    let source = WavFileSource::new(&path, config.source.block_size).unwrap();
    let mut sink = CollectingSink::new();
    let summary = run_pipeline(Box::new(source), &config, &mut sink).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(summary.samples, values.len() as u64);
    assert_eq!(summary.frames_closed, 5);
    assert_eq!(sink.peaks.last().unwrap(), &vec![3]);
    let last_raw = sink.raw.last().unwrap();
    assert_eq!(last_raw.len(), 24);
    approx::assert_relative_eq!(last_raw[3], 200.0);
}
