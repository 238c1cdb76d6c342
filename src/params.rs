//! Parameter definitions with physical units and documented semantics.

use crate::error::ConfigError;

/// Spectral analysis configuration.
///
/// Bin resolution is fixed once per session: the analyzer produces
/// `fft_size / 2` frequency bins and the same number of time-domain samples
/// per frame.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// FFT window size in samples (must be a power of two)
    pub fft_size: usize,

    /// Magnitude floor (decibels); bins at or below map to byte 0
    pub min_db: f32,

    /// Magnitude ceiling (decibels); bins at or above map to byte 255
    pub max_db: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_size: 8192,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

impl AnalysisConfig {
    /// Number of frequency bins produced per frame (fft_size / 2)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be a power of two, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 2 {
            return Err(ConfigError::FftSizeTooSmall(self.fft_size));
        }
        if !self.fft_size.is_power_of_two() {
            return Err(ConfigError::FftSizeNotPowerOfTwo(self.fft_size));
        }
        if self.min_db >= self.max_db {
            return Err(ConfigError::EmptyDecibelRange {
                min: self.min_db,
                max: self.max_db,
            });
        }
        Ok(())
    }
}

/// Mapping from analysis frames to mesh deformation.
#[derive(Debug, Clone)]
pub struct DeformationParams {
    /// Per-vertex displacement strength: each rest position is multiplied by
    /// `1 + t * waveform_scale`, t being the normalized time-domain sample
    /// in [-1, 1)
    pub waveform_scale: f32,

    /// Uniform radial growth per unit of average bin magnitude (0-255):
    /// `scale = 1 + mean * radius_scale`
    pub radius_scale: f32,
}

impl Default for DeformationParams {
    fn default() -> Self {
        Self {
            waveform_scale: 0.035,
            radius_scale: 0.015,
        }
    }
}

/// Sphere mesh resolution.
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    /// Sphere radius in world units (meters)
    pub radius_m: f32,

    /// Longitudinal subdivisions (around the equator)
    pub segments: usize,

    /// Latitudinal subdivisions (pole to pole)
    pub rings: usize,
}

impl Default for SphereGeometry {
    fn default() -> Self {
        Self {
            radius_m: 10.0,
            segments: 64,
            rings: 32,
        }
    }
}

impl SphereGeometry {
    /// Vertex count of the generated mesh: one vertex per pole plus
    /// `segments` per interior ring
    pub fn vertex_count(&self) -> usize {
        self.segments * (self.rings - 1) + 2
    }
}

/// Stationary camera parameters.
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Eye position (meters)
    pub position: [f32; 3],

    /// Look-at target (meters)
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 34.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbiting camera parameters (slow circle around the sphere).
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Orbit radius (meters)
    pub radius_m: f32,

    /// Constant eye height above the sphere's center (meters)
    pub height_m: f32,

    /// Angular speed (radians per second)
    pub angular_speed_rad_per_s: f32,

    /// Look-at target (meters)
    pub target: [f32; 3],
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius_m: 34.0,
            height_m: 8.0,
            angular_speed_rad_per_s: 0.25,
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    /// Stationary view of the sphere
    Fixed(FixedCamera),

    /// Slow orbit around the sphere
    Orbit(OrbitCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Orbit(OrbitCamera::default())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}
