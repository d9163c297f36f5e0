//! DSP engine — waveform generation, timeline mixing, and WAV encoding.
//!
//! Everything here is computed eagerly and returned by value: a request
//! becomes one normalized buffer, and a buffer becomes one WAV file.

pub mod buffer;
pub mod composer;
pub mod envelope;
pub mod generator;
pub mod mixer;
pub mod oscillator;
pub mod renderer;
