//! Backdrop image layer
//!
//! Holds the optional backdrop picture drawn behind the box. The image keeps
//! its aspect ratio: the fullscreen quad is scaled past the viewport edges
//! and the overflow is cropped.

use crate::gfx::resources::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Must match the `Backdrop` struct in `backdrop.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct BackdropUniform {
    scale: [f32; 2],
    _pad: [f32; 2],
}

pub struct BackdropLayer {
    layout: BindGroupLayoutWithDesc,
    ubo: UniformBuffer<BackdropUniform>,
    bind_group: Option<wgpu::BindGroup>,
    texture: Option<TextureResource>,
    image_aspect: f32,
}

impl BackdropLayer {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Backdrop Bind Group");

        Self {
            ubo: UniformBuffer::new(device),
            layout,
            bind_group: None,
            texture: None,
            image_aspect: 1.0,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    /// Uploads a decoded backdrop image and rebuilds the bind group
    pub fn set_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
    ) {
        let texture =
            TextureResource::create_from_rgba_data(device, queue, data, width, height, "Backdrop");
        self.image_aspect = width as f32 / height.max(1) as f32;
        self.bind_group = Some(
            BindGroupBuilder::new(&self.layout)
                .resource(self.ubo.binding_resource())
                .resource(wgpu::BindingResource::TextureView(&texture.view))
                .resource(wgpu::BindingResource::Sampler(&texture.sampler))
                .create(device, "Backdrop Bind Group"),
        );
        self.texture = Some(texture);
    }

    /// Drops the backdrop image; the solid color takes over again
    pub fn clear_image(&mut self) {
        self.texture = None;
        self.bind_group = None;
    }

    pub fn has_image(&self) -> bool {
        self.bind_group.is_some()
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    /// Recomputes the cover scale for the given render target size
    pub fn update_scale(&mut self, queue: &wgpu::Queue, target_width: u32, target_height: u32) {
        if target_height == 0 {
            return;
        }
        let target_aspect = target_width as f32 / target_height as f32;
        let scale = cover_scale(self.image_aspect, target_aspect);
        self.ubo.update_content(
            queue,
            BackdropUniform {
                scale,
                _pad: [0.0, 0.0],
            },
        );
    }
}

/// Quad scale that makes an image of `image_aspect` cover a target of
/// `target_aspect` without distortion; the larger axis overflows and is
/// cropped.
fn cover_scale(image_aspect: f32, target_aspect: f32) -> [f32; 2] {
    if image_aspect <= 0.0 || target_aspect <= 0.0 {
        return [1.0, 1.0];
    }
    [
        (image_aspect / target_aspect).max(1.0),
        (target_aspect / image_aspect).max(1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matching_aspect_is_unit_scale() {
        assert_eq!(cover_scale(1.5, 1.5), [1.0, 1.0]);
    }

    #[test]
    fn test_wide_image_crops_horizontally() {
        let [sx, sy] = cover_scale(2.0, 1.0);
        assert_relative_eq!(sx, 2.0);
        assert_relative_eq!(sy, 1.0);
    }

    #[test]
    fn test_tall_image_crops_vertically() {
        let [sx, sy] = cover_scale(0.5, 1.0);
        assert_relative_eq!(sx, 1.0);
        assert_relative_eq!(sy, 2.0);
    }

    #[test]
    fn test_degenerate_aspect_falls_back_to_unit() {
        assert_eq!(cover_scale(0.0, 1.0), [1.0, 1.0]);
    }
}
