//! Decoding of uploaded audio bytes.
//!
//! WAV goes through a small hound fast path, everything else through the
//! symphonia probe (FLAC, OGG/Vorbis, MP3, MP4/AAC — whatever the enabled
//! codec features support). No resampling: the clip keeps the file's
//! native sample rate.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use resp_core::{AudioClip, RespError, RespResult};

/// Decode raw audio bytes into a mono clip at the native sample rate.
pub fn decode_bytes(bytes: &[u8]) -> RespResult<AudioClip> {
    if bytes.is_empty() {
        return Err(RespError::Audio("Empty audio payload".to_string()));
    }

    // RIFF/WAVE magic: let hound handle it, symphonia's wav reader is
    // stricter about some in-the-wild encoder quirks.
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return decode_wav(bytes);
    }

    decode_with_symphonia(bytes)
}

/// Decode a WAV payload with hound.
fn decode_wav(bytes: &[u8]) -> RespResult<AudioClip> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| RespError::Audio(format!("Failed to open WAV: {}", e)))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RespError::Audio(format!("Failed to read samples: {}", e)))?,
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max_val = (1u32 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| RespError::Audio(format!("Failed to read samples: {}", e)))?
        }
    };

    debug!(
        "WAV decoded: {} samples, {} Hz, {} ch",
        samples.len(),
        sample_rate,
        channels
    );

    Ok(mixdown(samples, sample_rate, channels))
}

/// Decode any container/codec symphonia can probe.
fn decode_with_symphonia(bytes: &[u8]) -> RespResult<AudioClip> {
    let mss = MediaSourceStream::new(
        Box::new(Cursor::new(bytes.to_vec())),
        Default::default(),
    );

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RespError::Audio(format!("Unrecognized audio format: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| RespError::Audio("No audio track found".to_string()))?;
    let track_id = track.id;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1);
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| RespError::Audio("Unknown sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| RespError::Audio(format!("Unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an IO error in symphonia 0.5.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(RespError::Audio(format!("Demux error: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
                });
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Decodable errors on a single packet are recoverable, skip it.
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(RespError::Audio(format!("Decode error: {}", e))),
        }
    }

    if samples.is_empty() {
        return Err(RespError::Audio("No decodable audio data".to_string()));
    }

    debug!(
        "Decoded via symphonia: {} samples, {} Hz, {} ch",
        samples.len(),
        sample_rate,
        channels
    );

    Ok(mixdown(samples, sample_rate, channels))
}

/// Свести интерливленные каналы в моно усреднением.
fn mixdown(samples: Vec<f32>, sample_rate: u32, channels: usize) -> AudioClip {
    if channels <= 1 {
        return AudioClip::new(samples, sample_rate, 1);
    }

    let mono: Vec<f32> = samples
        .chunks(channels)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect();

    AudioClip::new(mono, sample_rate, channels)
}
