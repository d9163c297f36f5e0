//! Mono floating-point sample buffer tagged with its sample rate.

/// Mono f64 samples at a fixed sample rate.
///
/// Samples are nominally in [-1.0, 1.0]; while mixing they may exceed it
/// until the buffer is normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        SampleBuffer {
            samples,
            sample_rate,
        }
    }

    /// A zero-filled buffer of `len` samples.
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        SampleBuffer::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value (0.0 for an empty buffer).
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()))
    }

    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }
}
