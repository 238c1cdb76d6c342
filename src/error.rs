//! Error types for the analysis and session layers.

use thiserror::Error;

/// Invalid analysis configuration, rejected before any audio is connected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("FFT size must be at least 2, got {0}")]
    FftSizeTooSmall(usize),

    #[error("FFT size must be a power of 2, got {0}")]
    FftSizeNotPowerOfTwo(usize),

    #[error("decibel range is empty: min {min} >= max {max}")]
    EmptyDecibelRange { min: f32, max: f32 },
}

/// Failure to decode or play the provided audio data.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to decode audio data: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("decoded audio contains no samples")]
    Empty,

    #[error("no audio output device found")]
    NoDevice,

    #[error("failed to get audio output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio output stream: {0}")]
    Stream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio playback: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Why a start trigger did not move the session out of Idle.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("no audio data was provided")]
    MissingInput,

    #[error(transparent)]
    Audio(#[from] AudioError),
}
