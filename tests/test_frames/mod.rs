//! Helpers for building indexed frames in integration tests.

use framepack::FrameAssembler;

/// Indices `0..len` for one well-formed frame
pub fn frame_indices(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

/// A frame of `len` samples that all carry `value`
///
/// Useful for detecting torn frames: any presented frame must be uniform.
pub fn uniform_frame(value: f64, len: usize) -> (Vec<f64>, Vec<f64>) {
    (vec![value; len], frame_indices(len))
}

/// Feed `values` to the assembler in blocks of `block_size`
pub fn feed_in_blocks(
    assembler: &mut FrameAssembler,
    values: &[f64],
    indices: &[f64],
    block_size: usize,
) {
    for (v, i) in values.chunks(block_size).zip(indices.chunks(block_size)) {
        assembler.process(v, i);
    }
}

/// Close the frame in progress with a lone index-0 sample
pub fn close_frame(assembler: &mut FrameAssembler) {
    assembler.process(&[0.0], &[0.0]);
}
