//! Linear fade-in/fade-out envelope.

/// Symmetric fade applied to both ends of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    /// Ramp length in samples.
    pub fade_samples: usize,
}

impl FadeEnvelope {
    pub fn new(fade_seconds: f64, sample_rate: u32) -> Self {
        let fade = (fade_seconds.max(0.0) * sample_rate as f64).round() as usize;
        FadeEnvelope { fade_samples: fade }
    }

    /// Whether a segment of `len` samples is long enough for both ramps.
    pub fn fits(&self, len: usize) -> bool {
        self.fade_samples > 0 && len >= 2 * self.fade_samples
    }

    /// Gain of ramp step `k` out of `fade_samples`, running 0 → 1 with both
    /// endpoints included.
    fn ramp(&self, k: usize) -> f64 {
        if self.fade_samples <= 1 {
            0.0
        } else {
            k as f64 / (self.fade_samples - 1) as f64
        }
    }

    /// Shape `samples` in place. Segments shorter than two ramps are left
    /// untouched so the ramps never overlap.
    pub fn apply(&self, samples: &mut [f64]) {
        if !self.fits(samples.len()) {
            return;
        }
        let fade = self.fade_samples;
        let len = samples.len();
        for k in 0..fade {
            let gain = self.ramp(k);
            samples[k] *= gain;
            samples[len - 1 - k] *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_length_is_tenth_of_a_second() {
        let env = FadeEnvelope::new(0.1, 44100);
        assert_eq!(env.fade_samples, 4410);
    }

    #[test]
    fn ramps_both_ends() {
        let env = FadeEnvelope::new(0.1, 100);
        let mut buf = vec![1.0; 50];
        env.apply(&mut buf);
        assert_eq!(buf[0], 0.0);
        assert_eq!(buf[49], 0.0);
        assert!((buf[9] - 1.0).abs() < 1e-12);
        assert!((buf[40] - 1.0).abs() < 1e-12);
        assert!((buf[5] - 5.0 / 9.0).abs() < 1e-12);
        // untouched middle
        assert!(buf[10..40].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn ramp_is_monotonic() {
        let env = FadeEnvelope::new(0.1, 1000);
        let mut buf = vec![1.0; 400];
        env.apply(&mut buf);
        for w in buf[..100].windows(2) {
            assert!(w[1] >= w[0], "fade-in not rising: {} -> {}", w[0], w[1]);
        }
        for w in buf[300..].windows(2) {
            assert!(w[1] <= w[0], "fade-out not falling: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn exactly_two_fades_long_is_faded() {
        let env = FadeEnvelope::new(0.1, 100);
        let mut buf = vec![1.0; 20];
        env.apply(&mut buf);
        assert_eq!(buf[0], 0.0);
        assert_eq!(buf[19], 0.0);
        assert!((buf[9] - 1.0).abs() < 1e-12);
        assert!((buf[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn short_segment_untouched() {
        let env = FadeEnvelope::new(0.1, 100);
        let mut buf = vec![0.5; 19];
        env.apply(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn zero_fade_is_noop() {
        let env = FadeEnvelope::new(0.0, 44100);
        let mut buf = vec![0.25; 8];
        env.apply(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.25));
    }
}
