//! End-to-end: request → composed buffer → WAV bytes → decoded back.

use std::io::Cursor;
use std::thread;

use pretty_assertions::assert_eq;
use sangeet_core::dsp::renderer::{WAV_HEADER_LEN, quantize};
use sangeet_core::{
    CompositionRequest, EngineConfig, SampleBuffer, SangeetError, SongComposer, encode_wav,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn decode(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(Cursor::new(bytes)).expect("valid wav");
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("pcm samples");
    (spec, samples)
}

#[test]
fn reference_song_end_to_end() {
    init_tracing();
    let request = CompositionRequest::new("major", 10.0)
        .with_tempo(120)
        .with_instruments(["madal"]);
    let composer = SongComposer::default();

    let buffer = composer.compose(&request).unwrap();
    assert_eq!(buffer.len(), 441_000);
    assert!((buffer.peak() - 0.8).abs() < 1e-12);

    let wav = encode_wav(&buffer).unwrap();
    let bytes = wav.as_bytes();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    let data_size = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]);
    assert_eq!(data_size, 441_000 * 2);
    assert_eq!(bytes.len(), WAV_HEADER_LEN + 441_000 * 2);
}

#[test]
fn header_roundtrips_through_hound() {
    let composer = SongComposer::default();
    let buffer = composer.compose(&CompositionRequest::new("khamaj", 2.0)).unwrap();
    let wav = encode_wav(&buffer).unwrap();

    let (spec, samples) = decode(wav.as_bytes());
    assert_eq!(
        spec,
        hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    );
    assert_eq!(samples.len(), buffer.len());

    let expected: Vec<i16> = buffer.samples().iter().map(|&s| quantize(s)).collect();
    assert!(samples == expected, "decoded PCM differs from quantized buffer");

    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    assert_eq!(peak, 26214, "0.8 * 32767 rounded");
}

#[test]
fn custom_sample_rate_written_to_header() {
    let composer = SongComposer::from_json(r#"{ "synth": { "sampleRate": 22050 } }"#).unwrap();
    let wav = composer.compose_wav(&CompositionRequest::new("yaman", 1.0)).unwrap();
    let (spec, samples) = decode(wav.as_bytes());
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(samples.len(), 22050);
}

#[test]
fn silent_buffer_encodes_as_silence() {
    let wav = encode_wav(&SampleBuffer::silence(441, 44100)).unwrap();
    let (_, samples) = decode(wav.as_bytes());
    assert_eq!(samples, vec![0i16; 441]);
}

#[test]
fn failures_are_typed() {
    let composer = SongComposer::default();
    assert!(matches!(
        composer.compose(&CompositionRequest::new("major", 0.0)),
        Err(SangeetError::InvalidParameter { .. })
    ));
    assert!(matches!(
        encode_wav(&SampleBuffer::new(Vec::new(), 44100)),
        Err(SangeetError::Encoding { .. })
    ));
    assert!(matches!(
        SongComposer::from_json("[1, 2"),
        Err(SangeetError::Config(_))
    ));
}

#[test]
fn concurrent_compositions_share_one_engine() {
    let composer = SongComposer::new(EngineConfig::default()).unwrap();
    let reference = composer.compose(&CompositionRequest::new("bhairav", 1.5)).unwrap();

    let results: Vec<SampleBuffer> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| composer.compose(&CompositionRequest::new("bhairav", 1.5)).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for buffer in results {
        assert!(buffer == reference, "concurrent result differs");
    }
}
