//! Instrument and scale tables plus engine configuration.
//!
//! The engine reads these once at construction and never mutates them.
//! They deserialize from camelCase JSON so a host can ship its own tables;
//! every field has a default matching the built-in tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dsp::generator::DEFAULT_FADE_SECONDS;
use crate::dsp::mixer::DEFAULT_PEAK_TARGET;
use crate::error::{Result, SangeetError, ensure_positive};

// ── Instruments ─────────────────────────────────────────────

/// Broad instrument family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentCategory {
    Percussion,
    String,
    Wind,
}

/// A single instrument record. Its identifier is the key it is stored
/// under in an [`InstrumentTable`]; [`find_instrument`] returns both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub category: InstrumentCategory,
    /// Base frequency in Hz.
    pub base_frequency: f64,
}

impl Instrument {
    pub fn new(category: InstrumentCategory, base_frequency: f64) -> Self {
        Instrument {
            category,
            base_frequency,
        }
    }
}

/// Instrument identifier → record.
pub type InstrumentTable = BTreeMap<String, Instrument>;

/// Look up `id`, returning the stored identifier alongside the record.
pub fn find_instrument<'a>(table: &'a InstrumentTable, id: &str) -> Option<(&'a str, &'a Instrument)> {
    table.get_key_value(id).map(|(key, inst)| (key.as_str(), inst))
}

/// Built-in instruments: madal, sarangi, bansuri, damaru.
pub fn default_instruments() -> InstrumentTable {
    [
        ("madal", Instrument::new(InstrumentCategory::Percussion, 100.0)),
        ("sarangi", Instrument::new(InstrumentCategory::String, 220.0)),
        ("bansuri", Instrument::new(InstrumentCategory::Wind, 440.0)),
        ("damaru", Instrument::new(InstrumentCategory::Percussion, 200.0)),
    ]
    .into_iter()
    .map(|(id, inst)| (id.to_string(), inst))
    .collect()
}

// ── Scales ──────────────────────────────────────────────────

/// Scale tag → ordered note frequencies in Hz.
pub type ScaleTable = BTreeMap<String, Vec<f64>>;

/// Built-in scales rooted at C4.
///
/// `major` is the reference melody. The raga tables use the thaat notes in
/// equal temperament.
pub fn default_scales() -> ScaleTable {
    [
        ("major", vec![261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88]),
        ("khamaj", vec![261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 466.16]),
        ("bhairav", vec![261.63, 277.18, 329.63, 349.23, 392.00, 415.30, 493.88]),
        ("yaman", vec![261.63, 293.66, 329.63, 369.99, 392.00, 440.00, 493.88]),
    ]
    .into_iter()
    .map(|(tag, notes)| (tag.to_string(), notes))
    .collect()
}

// ── Voicing ─────────────────────────────────────────────────

/// How instrument selection affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voicing {
    /// Instruments and tempo are metadata only; one sine melody is rendered.
    #[default]
    Melody,
    /// Each selected instrument adds a layer of the melody transposed by its
    /// base frequency; percussion layers use a square wave.
    Layered,
}

// ── Engine configuration ────────────────────────────────────

/// Synthesis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthConfig {
    pub sample_rate: u32,
    /// Fade length at both ends of every note segment.
    pub fade_seconds: f64,
    /// Peak amplitude after normalization.
    pub peak_target: f64,
    /// Number of scale notes sequenced per song.
    pub notes_per_song: usize,
    /// Upper bound on a requested song duration.
    pub max_duration_seconds: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            sample_rate: 44100,
            fade_seconds: DEFAULT_FADE_SECONDS,
            peak_target: DEFAULT_PEAK_TARGET,
            notes_per_song: 4,
            max_duration_seconds: 600.0,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub synth: SynthConfig,
    pub instruments: InstrumentTable,
    pub scales: ScaleTable,
    /// Scale used when a request names an unknown tag.
    pub default_scale: String,
    /// Instrument used when a request selects none.
    pub default_instrument: String,
    pub voicing: Voicing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            synth: SynthConfig::default(),
            instruments: default_instruments(),
            scales: default_scales(),
            default_scale: "major".to_string(),
            default_instrument: "madal".to_string(),
            voicing: Voicing::Melody,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every table and setting. Scale length is checked per request,
    /// since a short scale only matters when it is selected.
    pub fn validate(&self) -> Result<()> {
        let synth = &self.synth;
        if synth.sample_rate == 0 {
            return Err(SangeetError::invalid_param("sampleRate", "must be > 0"));
        }
        if !synth.fade_seconds.is_finite() || synth.fade_seconds < 0.0 {
            return Err(SangeetError::invalid_param(
                "fadeSeconds",
                format!("must be a finite value >= 0, got {}", synth.fade_seconds),
            ));
        }
        ensure_positive("peakTarget", synth.peak_target)?;
        if synth.peak_target > 1.0 {
            return Err(SangeetError::invalid_param(
                "peakTarget",
                format!("must be <= 1.0, got {}", synth.peak_target),
            ));
        }
        if synth.notes_per_song == 0 {
            return Err(SangeetError::invalid_param("notesPerSong", "must be >= 1"));
        }
        ensure_positive("maxDurationSeconds", synth.max_duration_seconds)?;

        for (id, inst) in &self.instruments {
            ensure_positive(&format!("instruments.{id}.baseFrequency"), inst.base_frequency)?;
        }
        for (tag, notes) in &self.scales {
            for &freq in notes {
                ensure_positive(&format!("scales.{tag}"), freq)?;
            }
        }
        if !self.scales.contains_key(&self.default_scale) {
            return Err(SangeetError::invalid_param(
                "defaultScale",
                format!("'{}' is not in the scale table", self.default_scale),
            ));
        }
        if !self.instruments.contains_key(&self.default_instrument) {
            return Err(SangeetError::invalid_param(
                "defaultInstrument",
                format!("'{}' is not in the instrument table", self.default_instrument),
            ));
        }
        Ok(())
    }
}
