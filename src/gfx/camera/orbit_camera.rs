//! Orbit camera aimed at the box
//!
//! The camera orbits the origin in a Y-up coordinate system. Viewpoint
//! presets re-aim it by converting a cartesian eye point into the orbit's
//! distance/pitch/yaw; the mouse controls stay live between presets.

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Recalculated in `update()`.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(45.0).into(),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Re-aims the orbit at the origin from the given eye point.
    ///
    /// Degenerate inputs (zero-length eye) are ignored; the straight-down
    /// "top" viewpoint lands on the pitch bound just short of vertical.
    pub fn aim_from(&mut self, eye: Vector3<f32>) {
        let distance = eye.magnitude();
        if distance <= f32::EPSILON {
            return;
        }
        self.target = Vector3::zero();
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.pitch = (eye.y / distance)
            .asin()
            .clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.yaw = eye.x.atan2(eye.z);
        self.update();
    }

    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fovy = Deg(degrees).into();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        // Proportional step so zoom feels the same at every distance.
        let corrected_zoom = (self.distance * 0.2).max(0.05) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction.
    /// delta.0 = horizontal, delta.1 = vertical, both in view space.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Updates the eye after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(200.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CameraPreset;
    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.5)
    }

    #[test]
    fn test_aim_from_reproduces_preset_eye() {
        let mut cam = camera();
        for preset in [
            CameraPreset::FrontRight,
            CameraPreset::FrontLeft,
            CameraPreset::BackRight,
            CameraPreset::BackLeft,
            CameraPreset::Front,
            CameraPreset::Back,
        ] {
            let [x, y, z] = preset.eye();
            cam.aim_from(Vector3::new(x, y, z));
            assert_relative_eq!(cam.eye.x, x, epsilon = 1e-3);
            assert_relative_eq!(cam.eye.y, y, epsilon = 1e-3);
            assert_relative_eq!(cam.eye.z, z, epsilon = 1e-3);
            assert_eq!(cam.target, Vector3::zero());
        }
    }

    #[test]
    fn test_aim_from_top_clamps_pitch() {
        let mut cam = camera();
        let [x, y, z] = CameraPreset::Top.eye();
        cam.aim_from(Vector3::new(x, y, z));
        assert!(cam.pitch <= cam.bounds.max_pitch);
        // Nearly straight down: eye sits essentially on the Y axis.
        assert_relative_eq!(cam.eye.y, 5.0, epsilon = 1e-2);
    }

    #[test]
    fn test_aim_from_ignores_degenerate_eye() {
        let mut cam = camera();
        let before = cam.eye;
        cam.aim_from(Vector3::zero());
        assert_eq!(cam.eye, before);
    }

    #[test]
    fn test_distance_clamped_to_bounds() {
        let mut cam = camera();
        cam.set_distance(10_000.0);
        assert_eq!(cam.distance, 200.0);
        cam.set_distance(0.0);
        assert_eq!(cam.distance, 0.5);
    }

    #[test]
    fn test_fov_feeds_projection() {
        let mut cam = camera();
        cam.set_fov_degrees(90.0);
        assert_relative_eq!(cam.fovy.0, std::f32::consts::FRAC_PI_2, epsilon = 1e-5);
    }
}
