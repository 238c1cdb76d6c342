//! Maps analysis frames onto mesh deformation.

use crate::analyzer::AnalysisFrame;
use crate::mesh::SphereMesh;
use crate::params::DeformationParams;

/// Drives the two deformation layers: per-vertex waveform displacement and
/// a uniform radial scale from overall spectral energy.
pub struct DeformationEngine {
    params: DeformationParams,
}

impl DeformationEngine {
    pub fn new(params: DeformationParams) -> Self {
        Self { params }
    }

    /// Displace the mesh by the frame's waveform and return the uniform
    /// scale factor derived from the mean bin magnitude.
    ///
    /// The scale is applied by the renderer as the mesh's aggregate
    /// transform, on top of the per-vertex displacement.
    pub fn deform(&self, mesh: &mut SphereMesh, frame: &AnalysisFrame) -> f32 {
        mesh.apply_waveform(&frame.time_samples, self.params.waveform_scale);
        1.0 + mean(&frame.frequency_bins) * self.params.radius_scale
    }
}

/// Arithmetic mean of the bins; an empty frame counts as silence
fn mean(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&bin| bin as u32).sum();
    sum as f32 / bins.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SphereGeometry;

    fn test_mesh() -> SphereMesh {
        SphereMesh::new(&SphereGeometry {
            radius_m: 10.0,
            segments: 16,
            rings: 17,
        })
    }

    #[test]
    fn test_mean_is_exact_for_uniform_bins() {
        assert_eq!(mean(&[77; 4096]), 77.0);
        assert_eq!(mean(&[255; 2048]), 255.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_uniform_scale_formula() {
        let engine = DeformationEngine::new(DeformationParams::default());
        let mut mesh = test_mesh();

        let frame = AnalysisFrame {
            frequency_bins: vec![255; 4096],
            time_samples: vec![128; 4096],
        };
        let scale = engine.deform(&mut mesh, &frame);
        assert!((scale - 4.825).abs() < 1e-5);
    }

    #[test]
    fn test_silent_frame_leaves_mesh_at_rest() {
        let engine = DeformationEngine::new(DeformationParams::default());
        let mut mesh = test_mesh();
        let original: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();

        let frame = AnalysisFrame::silent(4096);
        let scale = engine.deform(&mut mesh, &frame);

        assert_eq!(scale, 1.0);
        let live: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(live, original);
    }

    #[test]
    fn test_full_scale_frame_displaces_every_axis() {
        let engine = DeformationEngine::new(DeformationParams::default());
        let mut mesh = test_mesh();
        let original: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();

        let frame = AnalysisFrame {
            frequency_bins: vec![255; 4096],
            time_samples: vec![255; 4096],
        };
        engine.deform(&mut mesh, &frame);

        // 255 -> t = 255/128 - 1, multiplier 1 + t * 0.035 on every axis
        let factor = 1.0 + (255.0 / 128.0 - 1.0) * 0.035;
        for (vertex, rest) in mesh.vertices.iter().zip(&original) {
            for axis in 0..3 {
                assert!((vertex.position[axis] - rest[axis] * factor).abs() < 1e-5);
            }
        }
    }
}
