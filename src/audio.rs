//! Audio decoding and playback.
//!
//! Decodes a user-provided byte buffer into an immutable in-memory PCM
//! stream, then plays it through the default output device while exposing
//! the playback cursor for spectral analysis.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rodio::Source;

use crate::error::AudioError;

/// Decoded audio: mono f32 PCM at the source sample rate.
///
/// Immutable once produced. Playback and analysis both read from it; neither
/// ever writes.
pub struct AudioStream {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioStream {
    /// Decode an audio file held in memory (wav, flac, vorbis or mp3).
    ///
    /// Multi-channel sources are downmixed to mono by averaging channels.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, AudioError> {
        let decoder = rodio::Decoder::new(Cursor::new(bytes))?;
        let sample_rate = decoder.sample_rate();
        let channels = decoder.channels() as usize;

        let interleaved: Vec<f32> = decoder.convert_samples::<f32>().collect();
        let samples = downmix(&interleaved, channels);
        if samples.is_empty() {
            return Err(AudioError::Empty);
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Source sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of mono samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the stream in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Sample at `index`, or silence outside the stream
    pub fn sample(&self, index: usize) -> f32 {
        self.samples.get(index).copied().unwrap_or(0.0)
    }

    /// Copy the `out.len()` samples ending at `end` (exclusive) into `out`.
    ///
    /// Positions before the start of the stream and past its end read as
    /// silence, so a cursor that keeps advancing past the final sample
    /// produces a window that decays to all zeros.
    pub fn window_ending_at(&self, end: usize, out: &mut [f32]) {
        let len = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            let index = end + i;
            *slot = if index >= len {
                self.sample(index - len)
            } else {
                0.0
            };
        }
    }
}

/// Average interleaved frames down to a single channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Live playback of an [`AudioStream`] through the default output device.
///
/// The source is resampled to the device rate with linear interpolation in
/// the output callback. The cursor (in source samples) keeps advancing after
/// the stream runs out; the callback then emits silence.
pub struct Playback {
    /// Playback cursor in source samples (written by the audio callback)
    position: Arc<AtomicUsize>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl Playback {
    /// Start playing `source` from time zero. No pause or seek is exposed.
    pub fn start(source: Arc<AudioStream>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;

        log::info!(
            "audio output: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            config.sample_rate().0
        );

        let channels = config.channels() as usize;
        let step = source.sample_rate() as f64 / config.sample_rate().0 as f64;

        let position = Arc::new(AtomicUsize::new(0));
        let position_writer = Arc::clone(&position);
        let mut cursor = 0.0f64;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let index = cursor as usize;
                    let frac = (cursor - index as f64) as f32;
                    let sample = source.sample(index) * (1.0 - frac)
                        + source.sample(index + 1) * frac;

                    for slot in frame.iter_mut() {
                        *slot = sample;
                    }
                    cursor += step;
                }
                position_writer.store(cursor as usize, Ordering::Relaxed);
            },
            |err| log::error!("audio stream error: {}", err),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            position,
            _stream: stream,
        })
    }

    /// Current playback cursor in source samples
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &sample in samples {
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_mono_wav() {
        let bytes = wav_bytes(&[0, 16384, -16384, 32767], 1, 44100);
        let stream = AudioStream::decode(bytes).unwrap();

        assert_eq!(stream.sample_rate(), 44100);
        assert_eq!(stream.len(), 4);
        assert!((stream.sample(1) - 0.5).abs() < 1e-3);
        assert!((stream.sample(2) + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_downmixes_stereo() {
        // One frame: left 0.25, right 0.75 -> mono 0.5
        let bytes = wav_bytes(&[8192, 24576], 2, 48000);
        let stream = AudioStream::decode(bytes).unwrap();

        assert_eq!(stream.sample_rate(), 48000);
        assert_eq!(stream.len(), 1);
        assert!((stream.sample(0) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = AudioStream::decode(vec![0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }

    #[test]
    fn test_sample_is_silent_outside_stream() {
        let bytes = wav_bytes(&[32767, 32767], 1, 44100);
        let stream = AudioStream::decode(bytes).unwrap();

        assert_eq!(stream.sample(2), 0.0);
        assert_eq!(stream.sample(1_000_000), 0.0);
    }

    #[test]
    fn test_window_ending_at_pads_before_start() {
        let bytes = wav_bytes(&[32767, 32767, 32767, 32767], 1, 44100);
        let stream = AudioStream::decode(bytes).unwrap();

        // Window of 4 ending at sample 2: two padded zeros, two real samples
        let mut out = [9.9f32; 4];
        stream.window_ending_at(2, &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.0);
        assert!(out[2] > 0.9);
        assert!(out[3] > 0.9);
    }

    #[test]
    fn test_window_ending_at_decays_past_end() {
        let bytes = wav_bytes(&[32767, 32767, 32767, 32767], 1, 44100);
        let stream = AudioStream::decode(bytes).unwrap();

        // Cursor far beyond the stream: the window is pure silence
        let mut out = [9.9f32; 4];
        stream.window_ending_at(100, &mut out);
        assert_eq!(out, [0.0; 4]);
    }
}
