//! WAV renderer — encodes a sample buffer as a 16-bit mono PCM WAV file.

use std::io::{self, Write};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, SangeetError};

use super::buffer::SampleBuffer;

/// MIME type of the encoded artifact.
pub const MIME_TYPE: &str = "audio/wav";

/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = BITS_PER_SAMPLE as usize / 8;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
/// RIFF size field counts everything after its own 8-byte chunk prefix.
const RIFF_OVERHEAD: u32 = WAV_HEADER_LEN as u32 - 8;

/// A complete, immutable WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Arc<[u8]>,
}

impl EncodedAudio {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    /// Write the whole file to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.bytes)
    }

    /// `data:audio/wav;base64,...` URL, suitable for a download link.
    pub fn to_data_url(&self) -> String {
        format!("data:{MIME_TYPE};base64,{}", STANDARD.encode(&self.bytes))
    }
}

impl AsRef<[u8]> for EncodedAudio {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Quantize one sample to 16-bit PCM. Input is clamped to [-1.0, 1.0]
/// first; NaN maps to 0.
pub fn quantize(sample: f64) -> i16 {
    let s = sample.clamp(-1.0, 1.0) * i16::MAX as f64;
    s.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Encode a normalized buffer as a mono 16-bit PCM WAV file.
pub fn encode_wav(buffer: &SampleBuffer) -> Result<EncodedAudio> {
    if buffer.is_empty() {
        return Err(SangeetError::encoding("cannot encode an empty sample buffer"));
    }
    if buffer.sample_rate() == 0 {
        return Err(SangeetError::encoding("sample rate must be > 0"));
    }
    let data_size = buffer
        .len()
        .checked_mul(BYTES_PER_SAMPLE)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(RIFF_OVERHEAD).is_some())
        .ok_or_else(|| {
            SangeetError::encoding(format!(
                "{} samples exceed the WAV size limit",
                buffer.len()
            ))
        })?;

    let byte_rate = buffer
        .sample_rate()
        .checked_mul(CHANNELS as u32 * BYTES_PER_SAMPLE as u32)
        .ok_or_else(|| {
            SangeetError::encoding(format!("sample rate {} is too high", buffer.sample_rate()))
        })?;

    let pcm: Vec<i16> = buffer.samples().iter().map(|&s| quantize(s)).collect();
    let bytes = write_header_and_data(&pcm, buffer.sample_rate(), byte_rate, data_size);
    tracing::debug!(
        samples = pcm.len(),
        sample_rate = buffer.sample_rate(),
        bytes = bytes.len(),
        "encoded wav"
    );
    Ok(EncodedAudio {
        bytes: bytes.into(),
    })
}

fn chunk_header(out: &mut Vec<u8>, id: &[u8; 4], len: u32) {
    out.extend_from_slice(id);
    out.extend_from_slice(&len.to_le_bytes());
}

fn write_header_and_data(samples: &[i16], sample_rate: u32, byte_rate: u32, data_size: u32) -> Vec<u8> {
    let block_align = CHANNELS * BYTES_PER_SAMPLE as u16;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);
    chunk_header(&mut out, b"RIFF", RIFF_OVERHEAD + data_size);
    out.extend_from_slice(b"WAVE");

    chunk_header(&mut out, b"fmt ", FMT_CHUNK_LEN);
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    chunk_header(&mut out, b"data", data_size);
    debug_assert_eq!(out.len(), WAV_HEADER_LEN);
    out.extend(samples.iter().flat_map(|s| s.to_le_bytes()));

    out
}
