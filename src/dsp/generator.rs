//! Waveform generator — one fade-shaped periodic segment per call.

use crate::error::{Result, SangeetError, ensure_positive};

use super::envelope::FadeEnvelope;
use super::oscillator::Waveform;

/// Default fade length at each end of a segment, in seconds.
pub const DEFAULT_FADE_SECONDS: f64 = 0.1;

/// Most samples one segment may hold: a 16-bit mono WAV data chunk
/// addresses at most `u32::MAX` bytes.
pub const MAX_SEGMENT_SAMPLES: usize = (u32::MAX / 2) as usize;

/// Produces periodic segments with a linear fade at both ends.
///
/// Output is a pure function of `(frequency, duration, waveform,
/// sample_rate, fade)`; the generator holds no per-call state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformGenerator {
    sample_rate: u32,
    envelope: FadeEnvelope,
}

impl WaveformGenerator {
    pub fn new(sample_rate: u32) -> Self {
        Self::with_fade(sample_rate, DEFAULT_FADE_SECONDS)
    }

    pub fn with_fade(sample_rate: u32, fade_seconds: f64) -> Self {
        WaveformGenerator {
            sample_rate,
            envelope: FadeEnvelope::new(fade_seconds, sample_rate),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Fade ramp length in samples.
    pub fn fade_samples(&self) -> usize {
        self.envelope.fade_samples
    }

    /// Number of samples a segment of `duration` seconds occupies. Fails
    /// if the count would not fit in a WAV data chunk.
    pub fn segment_len(&self, duration: f64) -> Result<usize> {
        let len = (duration * self.sample_rate as f64).round();
        if !(0.0..=MAX_SEGMENT_SAMPLES as f64).contains(&len) {
            return Err(SangeetError::invalid_param(
                "duration",
                format!("{duration} s is {len} samples, limit is {MAX_SEGMENT_SAMPLES}"),
            ));
        }
        Ok(len as usize)
    }

    /// Generate `round(sample_rate * duration)` samples of `waveform` at
    /// `frequency` Hz, faded in and out.
    pub fn generate(&self, frequency: f64, duration: f64, waveform: Waveform) -> Result<Vec<f64>> {
        ensure_positive("duration", duration)?;
        self.check_rate()?;
        let len = self.segment_len(duration)?;
        self.generate_len(frequency, len, waveform)
    }

    /// Generate exactly `len` samples. Used when the caller has already
    /// placed the segment on a sample grid.
    pub fn generate_len(&self, frequency: f64, len: usize, waveform: Waveform) -> Result<Vec<f64>> {
        ensure_positive("frequency", frequency)?;
        self.check_rate()?;
        if len > MAX_SEGMENT_SAMPLES {
            return Err(SangeetError::invalid_param(
                "len",
                format!("{len} samples exceeds the limit of {MAX_SEGMENT_SAMPLES}"),
            ));
        }

        let sr = self.sample_rate as f64;
        let mut samples: Vec<f64> = (0..len)
            .map(|i| waveform.value_at(frequency, i as f64 / sr))
            .collect();
        self.envelope.apply(&mut samples);
        Ok(samples)
    }

    fn check_rate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SangeetError::invalid_param("sample_rate", "must be > 0"));
        }
        Ok(())
    }
}

impl Default for WaveformGenerator {
    fn default() -> Self {
        WaveformGenerator::new(44100)
    }
}
