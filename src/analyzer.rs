//! Spectral analysis of the playing audio stream.
//!
//! Each frame the analyzer Hann-windows the most recent FFT-sized block of
//! samples at the playback cursor and reduces it to byte magnitudes: one
//! array of frequency bins and one array of time-domain samples, both of
//! length fft_size / 2.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::audio::{AudioStream, Playback};
use crate::error::{AudioError, ConfigError};
use crate::params::AnalysisConfig;

/// One analysis frame: byte magnitudes per frequency bin plus byte-encoded
/// time-domain samples. Both arrays have the session's fixed bin count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisFrame {
    /// Frequency-bin magnitudes, 0-255
    pub frequency_bins: Vec<u8>,

    /// Time-domain samples, 0-255 with 128 as the zero crossing
    pub time_samples: Vec<u8>,
}

impl AnalysisFrame {
    /// The frame a silent signal produces: zero magnitudes, centered samples
    pub fn silent(bin_count: usize) -> Self {
        Self {
            frequency_bins: vec![0; bin_count],
            time_samples: vec![128; bin_count],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.frequency_bins.len()
    }
}

/// Spectral analyzer owning the decoded stream and its playback.
pub struct SpectrumAnalyzer {
    config: AnalysisConfig,
    fft: Arc<dyn Fft<f32>>,

    /// Precomputed Hann window coefficients (fft_size entries)
    window: Vec<f32>,

    /// Scratch: latest raw sample window
    samples: Vec<f32>,

    /// Scratch: FFT input/output
    scratch: Vec<Complex<f32>>,

    /// Decoded stream and its playback, present once connected
    source: Option<(Arc<AudioStream>, Playback)>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer with a fixed bin resolution.
    ///
    /// Called exactly once per session, before any audio is connected.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| hann_window(i, config.fft_size))
            .collect();

        Ok(Self {
            samples: vec![0.0; config.fft_size],
            scratch: vec![Complex::new(0.0, 0.0); config.fft_size],
            window,
            fft,
            config,
            source: None,
        })
    }

    /// Number of frequency bins per frame, fixed for the session
    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Whether audio has been loaded and playback started
    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    /// Decode `bytes`, start playback from time zero, and wire the playback
    /// cursor into this analyzer.
    ///
    /// On failure nothing is connected and the caller decides how to report
    /// the error; there is no retry. No pause or seek is exposed afterwards.
    pub fn load_and_connect(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let stream = Arc::new(AudioStream::decode(bytes)?);
        let playback = Playback::start(Arc::clone(&stream))?;

        log::info!(
            "audio connected: {:.1}s @ {}Hz",
            stream.duration_secs(),
            stream.sample_rate()
        );

        self.source = Some((stream, playback));
        Ok(())
    }

    /// Instantaneous magnitudes at the current playback position.
    ///
    /// Returns the silent frame until audio is connected; callers gate
    /// ticking on readiness rather than on this.
    pub fn sample_frame(&mut self) -> AnalysisFrame {
        match &self.source {
            Some((stream, playback)) => {
                stream.window_ending_at(playback.position(), &mut self.samples);
                self.analyze_current_window()
            }
            None => AnalysisFrame::silent(self.config.bin_count()),
        }
    }

    /// Analyze an arbitrary window of raw samples.
    ///
    /// This is the transform behind [`sample_frame`](Self::sample_frame);
    /// shorter input is zero-padded, longer input is truncated.
    pub fn analyze_window(&mut self, input: &[f32]) -> AnalysisFrame {
        let n = self.config.fft_size;
        let copied = input.len().min(n);
        self.samples[..copied].copy_from_slice(&input[..copied]);
        self.samples[copied..].fill(0.0);
        self.analyze_current_window()
    }

    fn analyze_current_window(&mut self) -> AnalysisFrame {
        let n = self.config.fft_size;
        let bin_count = self.config.bin_count();

        for i in 0..n {
            self.scratch[i] = Complex::new(self.samples[i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let mut frame = AnalysisFrame {
            frequency_bins: vec![0; bin_count],
            time_samples: vec![0; bin_count],
        };

        for i in 0..bin_count {
            let magnitude = self.scratch[i].norm() / n as f32;
            frame.frequency_bins[i] =
                magnitude_to_byte(magnitude, self.config.min_db, self.config.max_db);
        }

        // The most recent half of the window, byte-encoded
        for i in 0..bin_count {
            frame.time_samples[i] = sample_to_byte(self.samples[n - bin_count + i]);
        }

        frame
    }
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Map a normalized magnitude onto 0-255 across the [min_db, max_db] range
fn magnitude_to_byte(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let scaled = (db - min_db) / (max_db - min_db) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

/// Map a sample in [-1, 1] onto 0-255 with 128 at zero
fn sample_to_byte(sample: f32) -> u8 {
    (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8
}
