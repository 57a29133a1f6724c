//! Global uniform bindings for camera and lighting
//!
//! Manages the uniform buffer and bind group for per-frame global state:
//! the camera matrices and the three-light rig (ambient fill, directional
//! key, point highlight). Bound to slot 0 in every render pipeline.

use cgmath::Vector3;

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    settings::LightSettings,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// Must match the `Globals` struct in the shaders exactly, including the
/// 16-byte alignment padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    ambient_color: [f32; 3],
    ambient_intensity: f32,
    directional_color: [f32; 3],
    directional_intensity: f32,
    directional_position: [f32; 3],
    _pad0: f32,
    point_color: [f32; 3],
    point_intensity: f32,
    point_position: [f32; 3],
    _pad1: f32,
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// World position of the fixed directional key light
pub const DIRECTIONAL_LIGHT_POSITION: [f32; 3] = [0.0, 5.0, 10.0];

/// Current world-space state of the three scene lights
///
/// Colors and intensities mirror the light settings; the point position is
/// derived from the camera eye plus the configured offset, and freezes in
/// place while the position lock is held.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub point_color: [f32; 3],
    pub point_intensity: f32,
    pub point_position: Vector3<f32>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 0.5,
            point_color: [1.0, 1.0, 1.0],
            point_intensity: 0.7,
            point_position: Vector3::new(2.0, 3.0, 2.0),
        }
    }
}

impl LightRig {
    /// Copies colors and intensities from the settings and recomputes the
    /// point light position unless it is locked.
    pub fn sync(&mut self, settings: &LightSettings, camera_eye: Vector3<f32>) {
        self.ambient_color = settings.ambient.color;
        self.ambient_intensity = settings.ambient.intensity;
        self.directional_color = settings.directional.color;
        self.directional_intensity = settings.directional.intensity;
        self.point_color = settings.point.color;
        self.point_intensity = settings.point.intensity;

        if !settings.point.lock_position {
            let [x, y, z] = settings.point.offset;
            self.point_position = camera_eye + Vector3::new(x, y, z);
        }
    }
}

/// Updates the global uniform buffer with camera and light data
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightRig,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        ambient_color: lights.ambient_color,
        ambient_intensity: lights.ambient_intensity,
        directional_color: lights.directional_color,
        directional_intensity: lights.directional_intensity,
        directional_position: DIRECTIONAL_LIGHT_POSITION,
        _pad0: 0.0,
        point_color: lights.point_color,
        point_intensity: lights.point_intensity,
        point_position: lights.point_position.into(),
        _pad1: 0.0,
    };

    ubo.update_content(queue, content);
}

/// Manages the bind group layout and bind group for global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group with the provided uniform buffer.
    ///
    /// Must be called before any rendering that reads global uniforms.
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LightSettings;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_light_follows_camera() {
        let mut rig = LightRig::default();
        let settings = LightSettings::default();
        rig.sync(&settings, Vector3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(rig.point_position.x, 12.0);
        assert_relative_eq!(rig.point_position.y, 3.0);
        assert_relative_eq!(rig.point_position.z, 2.0);
    }

    #[test]
    fn test_locked_point_light_stays_put() {
        let mut rig = LightRig::default();
        let mut settings = LightSettings::default();
        rig.sync(&settings, Vector3::new(1.0, 1.0, 1.0));
        let frozen = rig.point_position;

        settings.point.lock_position = true;
        rig.sync(&settings, Vector3::new(50.0, 50.0, 50.0));
        assert_eq!(rig.point_position, frozen);
    }

    #[test]
    fn test_sync_copies_colors_and_intensities() {
        let mut rig = LightRig::default();
        let mut settings = LightSettings::default();
        settings.ambient.color = [0.2, 0.3, 0.4];
        settings.point.intensity = 1.5;
        rig.sync(&settings, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(rig.ambient_color, [0.2, 0.3, 0.4]);
        assert_eq!(rig.point_intensity, 1.5);
    }
}
