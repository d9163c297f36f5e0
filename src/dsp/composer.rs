//! Song composer — sequences scale notes over a timeline and mixes them.
//!
//! The song is split into `notes_per_song` equal slots placed back to back.
//! Each slot gets one generated segment per voicing layer, summed into a
//! shared timeline, and the result is peak-normalized. The composer holds
//! only read-only tables, so one instance can serve many threads.

use std::ops::Range;

use crate::composition::CompositionRequest;
use crate::error::{Result, SangeetError, ensure_positive};
use crate::instrument::{EngineConfig, InstrumentCategory, Voicing, find_instrument};

use super::buffer::SampleBuffer;
use super::generator::WaveformGenerator;
use super::mixer::Mixer;
use super::oscillator::Waveform;
use super::renderer::{EncodedAudio, encode_wav};

/// Reference pitch for instrument transposition in layered voicing.
const LAYER_REFERENCE_HZ: f64 = 440.0;

/// One rendering layer: every slot is generated once per layer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layer {
    /// Frequency multiplier applied to each scale note.
    ratio: f64,
    waveform: Waveform,
}

const MELODY_LAYER: Layer = Layer {
    ratio: 1.0,
    waveform: Waveform::Sine,
};

/// Turns composition requests into normalized sample buffers.
#[derive(Debug, Clone)]
pub struct SongComposer {
    config: EngineConfig,
    generator: WaveformGenerator,
}

impl SongComposer {
    /// Build a composer from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let generator = WaveformGenerator::with_fade(config.synth.sample_rate, config.synth.fade_seconds);
        Ok(SongComposer { config, generator })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        SongComposer::new(EngineConfig::from_json(json)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.synth.sample_rate
    }

    /// Render `request` into a peak-normalized buffer spanning the full
    /// requested duration. Fails before allocating if the request is invalid.
    pub fn compose(&self, request: &CompositionRequest) -> Result<SampleBuffer> {
        let synth = &self.config.synth;
        let duration = ensure_positive("duration", request.duration)?;
        if duration > synth.max_duration_seconds {
            return Err(SangeetError::invalid_param(
                "duration",
                format!(
                    "{duration} s exceeds the {} s limit",
                    synth.max_duration_seconds
                ),
            ));
        }

        let notes = self.melody(&request.scale)?;
        let layers = self.layers(&request.instruments);

        let spans = self.slot_spans(duration, notes.len())?;
        let total = spans.last().map_or(0, |span| span.end);
        let mut mixer = Mixer::new(total, synth.sample_rate);
        mixer.peak_target = synth.peak_target;

        for (&note, span) in notes.iter().zip(&spans) {
            for layer in &layers {
                let frequency = note * layer.ratio;
                let segment = self.generator.generate_len(frequency, span.len(), layer.waveform)?;
                mixer.add_segment(span.start, &segment);
            }
        }

        let out = mixer.output();
        tracing::debug!(
            scale = %request.scale,
            tempo = request.tempo,
            notes = notes.len(),
            layers = layers.len(),
            samples = out.len(),
            peak = out.peak(),
            "composed song"
        );
        Ok(out)
    }

    /// Sample ranges of `slots` equal slots over `duration` seconds. Slot
    /// boundaries are rounded once, so the ranges tile `[0, total)` with no
    /// gap or overlap.
    pub(crate) fn slot_spans(&self, duration: f64, slots: usize) -> Result<Vec<Range<usize>>> {
        let total = self.generator.segment_len(duration)?;
        let slot = duration / slots as f64;
        let mut start = 0;
        let mut spans = Vec::with_capacity(slots);
        for i in 1..=slots {
            let end = if i == slots {
                total
            } else {
                self.generator.segment_len(i as f64 * slot)?.clamp(start, total)
            };
            spans.push(start..end);
            start = end;
        }
        Ok(spans)
    }

    /// Compose and encode in one step.
    pub fn compose_wav(&self, request: &CompositionRequest) -> Result<EncodedAudio> {
        encode_wav(&self.compose(request)?)
    }

    /// First `notes_per_song` notes of the requested scale. Unknown tags use
    /// the default scale; longer scales are truncated.
    fn melody(&self, tag: &str) -> Result<&[f64]> {
        let scale = match self.config.scales.get(tag) {
            Some(scale) => scale,
            None => {
                tracing::warn!(
                    scale = tag,
                    fallback = %self.config.default_scale,
                    "unknown scale, using default"
                );
                self.config
                    .scales
                    .get(&self.config.default_scale)
                    .ok_or_else(|| SangeetError::invalid_param("scale", "default scale is missing"))?
            }
        };

        let wanted = self.config.synth.notes_per_song;
        scale.get(..wanted).ok_or_else(|| {
            SangeetError::invalid_param(
                "scale",
                format!("'{tag}' has {} notes, need at least {wanted}", scale.len()),
            )
        })
    }

    fn layers(&self, selection: &[String]) -> Vec<Layer> {
        let default = [self.config.default_instrument.clone()];
        let selection = if selection.is_empty() {
            tracing::warn!(
                fallback = %self.config.default_instrument,
                "no instruments selected, using default"
            );
            &default[..]
        } else {
            selection
        };

        let known: Vec<_> = selection
            .iter()
            .filter_map(|id| match find_instrument(&self.config.instruments, id) {
                Some((id, inst)) => {
                    tracing::trace!(instrument = id, category = ?inst.category, "instrument selected");
                    Some(inst)
                }
                None => {
                    tracing::warn!(instrument = %id, "unknown instrument ignored");
                    None
                }
            })
            .collect();

        match self.config.voicing {
            Voicing::Melody => vec![MELODY_LAYER],
            Voicing::Layered if known.is_empty() => vec![MELODY_LAYER],
            Voicing::Layered => known
                .into_iter()
                .map(|inst| Layer {
                    ratio: inst.base_frequency / LAYER_REFERENCE_HZ,
                    waveform: match inst.category {
                        InstrumentCategory::Percussion => Waveform::Square,
                        InstrumentCategory::String | InstrumentCategory::Wind => Waveform::Sine,
                    },
                })
                .collect(),
        }
    }
}

impl Default for SongComposer {
    fn default() -> Self {
        let config = EngineConfig::default();
        let generator = WaveformGenerator::with_fade(config.synth.sample_rate, config.synth.fade_seconds);
        SongComposer { config, generator }
    }
}
