//! Composition request — the record a host submits to get a song.

use serde::{Deserialize, Serialize};

/// What to compose.
///
/// `tempo` and `instruments` are carried through to the composer; under the
/// default melody voicing they do not change the rendered audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionRequest {
    /// Scale tag, e.g. "major" or "yaman".
    pub scale: String,
    /// Beats per minute.
    pub tempo: u32,
    /// Instrument identifiers. Empty falls back to the engine default.
    pub instruments: Vec<String>,
    /// Total song length in seconds.
    pub duration: f64,
}

impl Default for CompositionRequest {
    fn default() -> Self {
        CompositionRequest {
            scale: "major".to_string(),
            tempo: 120,
            instruments: vec!["madal".to_string()],
            duration: 10.0,
        }
    }
}

impl CompositionRequest {
    pub fn new(scale: impl Into<String>, duration: f64) -> Self {
        CompositionRequest {
            scale: scale.into(),
            duration,
            ..Default::default()
        }
    }

    pub fn with_tempo(mut self, tempo: u32) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn with_instruments<I, S>(mut self, instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instruments = instruments.into_iter().map(Into::into).collect();
        self
    }
}
