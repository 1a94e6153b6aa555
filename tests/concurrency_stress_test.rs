mod test_frames;

use std::thread;

use framepack::config::{OutputLength, PresenterConfig};
use framepack::frame_channel;

use test_frames::{close_frame, uniform_frame};

const FRAMES: u64 = 3000;

fn frame_length(id: u64) -> usize {
    16 + (id % 50) as usize
}

#[test]
fn test_no_torn_frames_under_concurrent_presentation() {
    let config = PresenterConfig {
        output_length: OutputLength::Full,
        ..PresenterConfig::default()
    };
    let (mut assembler, mut presenter) = frame_channel(&config);

    let producer = thread::spawn(move || {
        for id in 1..=FRAMES {
            let (values, indices) = uniform_frame(id as f64, frame_length(id));
            // split across two blocks so frames straddle activations
            let mid = values.len() / 3;
            assembler.process(&values[..mid], &indices[..mid]);
            assembler.process(&values[mid..], &indices[mid..]);
        }
        close_frame(&mut assembler);
        assembler.frames_closed()
    });

    let mut last_id = 0.0;
    let mut distinct_frames = 0u64;
    while !producer.is_finished() {
        let presentation = presenter.present();
        if presentation.raw.is_empty() {
            continue;
        }

        let id = presentation.raw[0];
        assert!(
            presentation.raw.iter().all(|&v| v == id),
            "torn frame: {:?}",
            presentation.raw
        );
        assert_eq!(presentation.frame_size, frame_length(id as u64));
        assert!(id >= last_id, "frame {} presented after {}", id, last_id);
        if presentation.new_frame && id > last_id {
            distinct_frames += 1;
        }
        last_id = id;
    }

    let frames_closed = producer.join().unwrap();
    assert_eq!(frames_closed, FRAMES + 1);
    assert!(distinct_frames <= FRAMES);

    // the final frame is always the one left after the producer stops
    let presentation = presenter.present();
    if presentation.new_frame {
        assert_eq!(presentation.raw[0], FRAMES as f64);
    } else {
        assert_eq!(last_id, FRAMES as f64);
    }
}

#[test]
fn test_overflow_flag_survives_concurrent_clearing() {
    let (mut assembler, mut presenter) = frame_channel(&PresenterConfig::default());
    let rounds = 2000;

    let producer = thread::spawn(move || {
        for _ in 0..rounds {
            assembler.process(&[1.0, 2.0], &[0.0, 9000.0]);
        }
        assembler
    });

    let mut reports = 0u64;
    while !producer.is_finished() {
        if presenter.present().overflow_reported {
            reports += 1;
        }
    }
    let assembler = producer.join().unwrap();
    if presenter.present().overflow_reported {
        reports += 1;
    }

    assert!(reports >= 1);
    assert!(reports <= rounds);
    assert!(!assembler.overflow_pending());
}
