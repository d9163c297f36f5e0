//! Periodic waveform shapes evaluated at an absolute time.

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
}

impl Waveform {
    /// Parse a waveform tag. Unrecognized tags fall back to `Sine` so that
    /// generation stays total; the fallback is logged.
    pub fn parse(tag: &str) -> Waveform {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sine" => Waveform::Sine,
            "square" => Waveform::Square,
            other => {
                tracing::warn!(waveform = other, "unrecognized waveform, falling back to sine");
                Waveform::Sine
            }
        }
    }

    /// Value of the waveform at time `t` seconds for the given frequency.
    pub fn value_at(self, frequency: f64, t: f64) -> f64 {
        let s = (2.0 * PI * frequency * t).sin();
        match self {
            Waveform::Sine => s,
            Waveform::Square => sign(s),
        }
    }
}

impl FromStr for Waveform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Waveform::parse(s))
    }
}

/// Sign with `sign(0) == 0`; `f64::signum` would return 1.0 for +0.0.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
