//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use sonosphere::params::{
    AnalysisConfig, CameraPreset, DeformationParams, FixedCamera, OrbitCamera,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sonosphere")]
#[command(about = "Audio-reactive sphere visualizer", long_about = None)]
pub struct Args {
    /// Audio file to visualize (may also be dropped onto the window)
    pub file: Option<PathBuf>,

    /// FFT window size in samples (power of two)
    #[arg(long, value_name = "SAMPLES", default_value = "8192")]
    pub fft_size: usize,

    /// Per-vertex waveform displacement strength
    #[arg(long, value_name = "SCALE", default_value = "0.035")]
    pub waveform_scale: f32,

    /// Uniform radial growth per unit of average bin magnitude
    #[arg(long, value_name = "SCALE", default_value = "0.015")]
    pub radius_scale: f32,

    /// Camera preset: orbit (default), fixed
    #[arg(long, value_name = "PRESET", default_value = "orbit")]
    pub camera_preset: String,
}

impl Args {
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            fft_size: self.fft_size,
            ..AnalysisConfig::default()
        }
    }

    pub fn deformation_params(&self) -> DeformationParams {
        DeformationParams {
            waveform_scale: self.waveform_scale,
            radius_scale: self.radius_scale,
        }
    }

    /// Parse camera preset from command-line arguments
    pub fn parse_camera_preset(&self) -> CameraPreset {
        match self.camera_preset.to_lowercase().as_str() {
            "orbit" => {
                println!("Camera: Orbit (slow circle around the sphere)");
                CameraPreset::Orbit(OrbitCamera::default())
            }
            "fixed" => {
                println!("Camera: Fixed");
                CameraPreset::Fixed(FixedCamera::default())
            }
            other => {
                eprintln!("Warning: Unknown camera preset '{}', using orbit", other);
                CameraPreset::Orbit(OrbitCamera::default())
            }
        }
    }

    /// Read the audio file named on the command line, if any
    pub fn read_audio_bytes(&self) -> Option<Vec<u8>> {
        let path = self.file.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                eprintln!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}
