/// Consecutive indices `start..start + len` as raw index samples
pub fn ramp(start: usize, len: usize) -> Vec<f64> {
    (start..start + len).map(|i| i as f64).collect()
}
