//! Camera presets for framing the sphere.

use glam::{Mat4, Vec3};

use crate::params::{CameraPreset, FixedCamera, OrbitCamera, RenderConfig};

/// Camera system with selectable framing preset
pub struct CameraSystem {
    preset: CameraPreset,
}

impl CameraSystem {
    /// Create new camera system with specified preset
    pub fn new(preset: CameraPreset) -> Self {
        Self { preset }
    }

    /// Compute camera position and look-at target for given time
    pub fn compute_position_and_target(&self, time_s: f32) -> (Vec3, Vec3) {
        match &self.preset {
            CameraPreset::Fixed(params) => Self::compute_fixed_path(params),
            CameraPreset::Orbit(params) => Self::compute_orbit_path(params, time_s),
        }
    }

    /// Stationary view of the target
    fn compute_fixed_path(p: &FixedCamera) -> (Vec3, Vec3) {
        (Vec3::from_array(p.position), Vec3::from_array(p.target))
    }

    /// Slow circle around the target at constant height
    fn compute_orbit_path(p: &OrbitCamera, time_s: f32) -> (Vec3, Vec3) {
        let angle = time_s * p.angular_speed_rad_per_s;
        let eye = Vec3::new(
            angle.cos() * p.radius_m,
            p.height_m,
            angle.sin() * p.radius_m,
        );
        (eye, Vec3::from_array(p.target))
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(
        &self,
        time_s: f32,
        render_config: &RenderConfig,
    ) -> (Mat4, Vec3) {
        let (eye, target) = self.compute_position_and_target(time_s);

        // Always keep Y as up vector (camera never rolls)
        let up = Vec3::Y;

        let view = Mat4::look_at_rh(eye, target, up);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_camera_is_stationary() {
        let camera = CameraSystem::new(CameraPreset::Fixed(FixedCamera::default()));

        let (eye0, target0) = camera.compute_position_and_target(0.0);
        let (eye1, target1) = camera.compute_position_and_target(42.0);

        assert_eq!(eye0, eye1);
        assert_eq!(target0, target1);
    }

    #[test]
    fn test_orbit_camera_stays_on_its_circle() {
        let params = OrbitCamera::default();
        let camera = CameraSystem::new(CameraPreset::Orbit(params.clone()));

        for t in 0..100 {
            let (eye, target) = camera.compute_position_and_target(t as f32 * 0.3);

            let horizontal = (eye.x * eye.x + eye.z * eye.z).sqrt();
            assert!(
                (horizontal - params.radius_m).abs() < 1e-3,
                "orbit radius {} drifted to {} at t={}",
                params.radius_m,
                horizontal,
                t
            );
            assert_eq!(eye.y, params.height_m);
            assert_eq!(target, Vec3::from_array(params.target));
        }
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = CameraSystem::new(CameraPreset::default());
        let render_config = RenderConfig::default();

        let (view_proj, eye_pos) = camera.create_view_proj_matrix(0.0, &render_config);

        // Matrix should not be identity or zero
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);

        // Eye position should be valid (not NaN or infinite)
        assert!(eye_pos.x.is_finite());
        assert!(eye_pos.y.is_finite());
        assert!(eye_pos.z.is_finite());
    }
}
