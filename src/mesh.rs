//! Sphere mesh generation and waveform-driven vertex displacement.

use bytemuck::{Pod, Zeroable};

use crate::params::SphereGeometry;

/// Vertex data for the sphere mesh (position + outward normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// UV sphere whose live vertex positions are displaced every frame relative
/// to a rest pose.
///
/// The rest pose is captured from the live positions on the first
/// displacement and never changes afterwards, so every later frame scales
/// the original sphere rather than compounding on prior frames.
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,

    /// Original vertex positions, captured once on first displacement
    rest_pose: Option<Vec<[f32; 3]>>,
}

impl SphereMesh {
    /// Generate a UV sphere: single vertices at the poles, `segments`
    /// vertices on each of the `rings - 1` interior rings.
    pub fn new(geometry: &SphereGeometry) -> Self {
        let radius = geometry.radius_m;
        let segments = geometry.segments;
        let rings = geometry.rings;

        let mut vertices = Vec::with_capacity(geometry.vertex_count());
        let mut indices = Vec::new();

        let north = [0.0, radius, 0.0];
        vertices.push(Vertex {
            position: north,
            normal: [0.0, 1.0, 0.0],
        });

        for ring in 1..rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            for segment in 0..segments {
                let theta = std::f32::consts::TAU * segment as f32 / segments as f32;
                let normal = [
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ];
                vertices.push(Vertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                });
            }
        }

        let south_index = vertices.len() as u32;
        vertices.push(Vertex {
            position: [0.0, -radius, 0.0],
            normal: [0.0, -1.0, 0.0],
        });

        // Interior ring `k` starts at vertex 1 + (k - 1) * segments
        let ring_start = |ring: usize| 1 + (ring - 1) * segments;

        // Top cap (counter-clockwise seen from outside)
        for segment in 0..segments {
            let a = (ring_start(1) + segment) as u32;
            let b = (ring_start(1) + (segment + 1) % segments) as u32;
            indices.extend_from_slice(&[0, b, a]);
        }

        // Quads between consecutive interior rings
        for ring in 1..rings - 1 {
            for segment in 0..segments {
                let a = (ring_start(ring) + segment) as u32;
                let b = (ring_start(ring) + (segment + 1) % segments) as u32;
                let c = (ring_start(ring + 1) + segment) as u32;
                let d = (ring_start(ring + 1) + (segment + 1) % segments) as u32;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }

        // Bottom cap
        for segment in 0..segments {
            let a = (ring_start(rings - 1) + segment) as u32;
            let b = (ring_start(rings - 1) + (segment + 1) % segments) as u32;
            indices.extend_from_slice(&[south_index, a, b]);
        }

        Self {
            vertices,
            indices,
            rest_pose: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Rest positions, if the first displacement has happened yet
    pub fn rest_pose(&self) -> Option<&[[f32; 3]]> {
        self.rest_pose.as_deref()
    }

    /// Displace every live position from its rest position by the
    /// byte-encoded waveform.
    ///
    /// Vertex `i` reads `time_samples[i % len]`, so the sample count and the
    /// vertex count may differ freely. A sample of 128 leaves the vertex
    /// exactly at rest. Captures the rest pose on the first call; an empty
    /// waveform leaves the live positions untouched.
    pub fn apply_waveform(&mut self, time_samples: &[u8], waveform_scale: f32) {
        if self.rest_pose.is_none() {
            self.rest_pose = Some(self.vertices.iter().map(|v| v.position).collect());
        }
        if time_samples.is_empty() {
            return;
        }
        let Some(rest_pose) = self.rest_pose.as_deref() else {
            return;
        };

        for (i, (vertex, rest)) in self.vertices.iter_mut().zip(rest_pose).enumerate() {
            let t = time_samples[i % time_samples.len()] as f32 / 128.0 - 1.0;
            let factor = 1.0 + t * waveform_scale;
            vertex.position = [rest[0] * factor, rest[1] * factor, rest[2] * factor];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(segments: usize, rings: usize) -> SphereGeometry {
        SphereGeometry {
            radius_m: 10.0,
            segments,
            rings,
        }
    }

    fn length(v: &[f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_sphere_vertex_and_index_counts() {
        let mesh = SphereMesh::new(&geometry(16, 17));

        assert_eq!(mesh.vertex_count(), 258);
        // 2 * segments cap triangles + 2 * segments * (rings - 2) band triangles
        assert_eq!(mesh.indices.len(), 6 * 16 * 16);
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let mesh = SphereMesh::new(&geometry(16, 17));

        for vertex in &mesh.vertices {
            assert!((length(&vertex.position) - 10.0).abs() < 1e-4);
            assert!((length(&vertex.normal) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let mesh = SphereMesh::new(&geometry(16, 17));
        let n = mesh.vertex_count() as u32;

        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_rest_pose_captured_once() {
        let mut mesh = SphereMesh::new(&geometry(16, 17));
        assert!(mesh.rest_pose().is_none());

        let original: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();

        mesh.apply_waveform(&[255; 8], 0.035);
        let captured: Vec<[f32; 3]> = mesh.rest_pose().unwrap().to_vec();
        assert_eq!(captured, original);

        // A second displacement must not re-capture from the deformed state
        mesh.apply_waveform(&[0; 8], 0.035);
        assert_eq!(mesh.rest_pose().unwrap(), original.as_slice());
    }

    #[test]
    fn test_centered_waveform_returns_to_rest() {
        let mut mesh = SphereMesh::new(&geometry(16, 17));
        let original: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();

        mesh.apply_waveform(&[200, 17, 255, 0], 0.035);
        mesh.apply_waveform(&[128; 4], 0.035);

        let live: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(live, original);
    }

    #[test]
    fn test_waveform_wraps_when_counts_differ() {
        // More bins than vertices
        let mut mesh = SphereMesh::new(&geometry(16, 17));
        assert_eq!(mesh.vertex_count(), 258);
        mesh.apply_waveform(&vec![255; 2048], 0.035);
        for (vertex, rest) in mesh.vertices.iter().zip(mesh.rest_pose.as_deref().unwrap()) {
            assert!(length(&vertex.position) > length(rest));
        }

        // Fewer bins than vertices: the modulo wrap still reaches every vertex
        let mut mesh = SphereMesh::new(&geometry(16, 17));
        mesh.apply_waveform(&[255; 4], 0.035);
        for (vertex, rest) in mesh.vertices.iter().zip(mesh.rest_pose.as_deref().unwrap()) {
            assert!(length(&vertex.position) > length(rest));
        }
    }

    #[test]
    fn test_empty_waveform_is_a_no_op() {
        let mut mesh = SphereMesh::new(&geometry(16, 17));
        let original: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();

        mesh.apply_waveform(&[], 0.035);

        let live: Vec<[f32; 3]> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(live, original);
        // The rest pose is still captured so later frames have a baseline
        assert!(mesh.rest_pose().is_some());
    }
}
