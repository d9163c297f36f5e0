//! Mixer — sums segments into a shared timeline and peak-normalizes it.

use super::buffer::SampleBuffer;

/// Default normalization ceiling; leaves headroom for 16-bit quantization.
pub const DEFAULT_PEAK_TARGET: f64 = 0.8;

/// An additive timeline buffer of fixed length.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub peak_target: f64,
    buffer: Vec<f64>,
    sample_rate: u32,
}

impl Mixer {
    /// A zero-filled timeline of `num_samples`.
    pub fn new(num_samples: usize, sample_rate: u32) -> Self {
        Mixer {
            peak_target: DEFAULT_PEAK_TARGET,
            buffer: vec![0.0; num_samples],
            sample_rate,
        }
    }

    /// Add a sample at the given index. Indices past the end are dropped.
    pub fn add(&mut self, index: usize, sample: f64) {
        if let Some(slot) = self.buffer.get_mut(index) {
            *slot += sample;
        }
    }

    /// Sum `segment` into the timeline starting at `offset`, truncating at
    /// the end of the buffer. Returns the number of samples written.
    pub fn add_segment(&mut self, offset: usize, segment: &[f64]) -> usize {
        let Some(tail) = self.buffer.get_mut(offset..) else {
            return 0;
        };
        let n = tail.len().min(segment.len());
        for (dst, &src) in tail[..n].iter_mut().zip(segment) {
            *dst += src;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Finish mixing: peak-normalize to `peak_target` and hand the buffer out.
    pub fn output(self) -> SampleBuffer {
        let mut out = SampleBuffer::new(self.buffer, self.sample_rate);
        normalize_peak(&mut out, self.peak_target);
        out
    }
}

/// Scale `buffer` so its peak absolute value equals `target`. Silent
/// buffers are left as they are. Returns the gain applied.
pub fn normalize_peak(buffer: &mut SampleBuffer, target: f64) -> f64 {
    let peak = buffer.peak();
    if peak == 0.0 || !peak.is_finite() {
        return 1.0;
    }
    let gain = target / peak;
    for s in buffer.samples_mut() {
        *s *= gain;
    }
    gain
}
