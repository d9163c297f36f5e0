pub mod composition;
pub mod dsp;
pub mod error;
pub mod instrument;

pub use crate::composition::CompositionRequest;
pub use crate::dsp::buffer::SampleBuffer;
pub use crate::dsp::composer::SongComposer;
pub use crate::dsp::generator::WaveformGenerator;
pub use crate::dsp::oscillator::Waveform;
pub use crate::dsp::renderer::{EncodedAudio, MIME_TYPE, encode_wav};
pub use crate::error::{Result, SangeetError};
pub use crate::instrument::{EngineConfig, Instrument, InstrumentCategory, SynthConfig, Voicing};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the sangeet-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js(err: SangeetError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn request_from_js(request: JsValue) -> std::result::Result<CompositionRequest, JsValue> {
    serde_wasm_bindgen::from_value(request).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: compose a song with the built-in tables and return the
/// WAV file bytes.
#[wasm_bindgen]
pub fn compose_song_wav(request: JsValue) -> std::result::Result<Vec<u8>, JsValue> {
    let request = request_from_js(request)?;
    let wav = SongComposer::default().compose_wav(&request).map_err(to_js)?;
    Ok(wav.to_vec())
}

/// WASM-exposed: compose with a JSON engine configuration (custom
/// instruments, scales, sample rate).
#[wasm_bindgen]
pub fn compose_song_wav_with_config(
    config_json: &str,
    request: JsValue,
) -> std::result::Result<Vec<u8>, JsValue> {
    let composer = SongComposer::from_json(config_json).map_err(to_js)?;
    let request = request_from_js(request)?;
    let wav = composer.compose_wav(&request).map_err(to_js)?;
    Ok(wav.to_vec())
}

/// WASM-exposed: compose to mono f32 samples for direct playback.
#[wasm_bindgen]
pub fn compose_song_samples(request: JsValue) -> std::result::Result<Vec<f32>, JsValue> {
    let request = request_from_js(request)?;
    let buffer = SongComposer::default().compose(&request).map_err(to_js)?;
    Ok(buffer.samples().iter().map(|&s| s as f32).collect())
}
