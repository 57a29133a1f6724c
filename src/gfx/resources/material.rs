//! Per-face material system
//!
//! Each box side has its own [`FaceMaterial`] holding the face texture and
//! the shared shading parameters (shininess, specular "shine" color). Faces
//! without a user texture show a procedural grid placeholder. Materials are
//! stored in a [`MaterialSet`] in the fixed face slot order.

use wgpu::Device;

use crate::gfx::geometry::{Face, FACE_ORDER};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

use super::texture_resource::TextureResource;

/// Pixel size of the generated placeholder texture
const PLACEHOLDER_SIZE: u32 = 512;
/// Grid cell size of the placeholder pattern, in pixels
const PLACEHOLDER_GRID: u32 = 32;

/// GPU uniform data for a face material
///
/// Must match the `Material` struct in `phong.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub specular: [f32; 3],
    pub shininess: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Creates the bind group layout shared by all face materials:
/// shading uniform, face texture, sampler.
pub fn material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .next_binding_fragment(binding_types::texture_2d())
        .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
        .create(device, "Face Material Bind Group")
}

/// Surface definition for one box side
pub struct FaceMaterial {
    pub face: Face,
    pub shininess: f32,
    pub specular: [f32; 3],
    /// Whether a user texture has replaced the placeholder
    pub textured: bool,

    texture: Option<TextureResource>,
    ubo: Option<MaterialUBO>,
    bind_group: Option<wgpu::BindGroup>,
}

impl FaceMaterial {
    pub fn new(face: Face) -> Self {
        Self {
            face,
            shininess: 30.0,
            specular: [1.0, 1.0, 1.0],
            textured: false,
            texture: None,
            ubo: None,
            bind_group: None,
        }
    }

    /// Replaces this face's texture with decoded RGBA image data
    pub fn set_texture(
        &mut self,
        layout: &BindGroupLayoutWithDesc,
        device: &Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
    ) {
        let label = format!("{} Face Texture", self.face.label());
        let texture =
            TextureResource::create_from_rgba_data(device, queue, data, width, height, &label);
        self.texture = Some(texture);
        self.textured = true;
        self.rebuild_bind_group(layout, device);
    }

    /// Ensures GPU resources exist and match the current shading values.
    ///
    /// Called every frame; the uniform write is skipped when nothing changed.
    pub fn update_gpu_resources(
        &mut self,
        layout: &BindGroupLayoutWithDesc,
        device: &Device,
        queue: &wgpu::Queue,
    ) {
        if self.ubo.is_none() {
            self.ubo = Some(MaterialUBO::new(device));
        }
        if self.texture.is_none() {
            let placeholder = placeholder_rgba();
            let texture = TextureResource::create_from_rgba_data(
                device,
                queue,
                &placeholder,
                PLACEHOLDER_SIZE,
                PLACEHOLDER_SIZE,
                "Placeholder Face Texture",
            );
            self.texture = Some(texture);
        }
        if self.bind_group.is_none() {
            self.rebuild_bind_group(layout, device);
        }

        let uniform = MaterialUniform {
            specular: self.specular,
            shininess: self.shininess,
        };
        if let Some(ubo) = &mut self.ubo {
            ubo.update_content(queue, uniform);
        }
    }

    fn rebuild_bind_group(&mut self, layout: &BindGroupLayoutWithDesc, device: &Device) {
        let (Some(ubo), Some(texture)) = (&self.ubo, &self.texture) else {
            return;
        };
        let label = format!("{} Face Material", self.face.label());
        self.bind_group = Some(
            BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .resource(wgpu::BindingResource::TextureView(&texture.view))
                .resource(wgpu::BindingResource::Sampler(&texture.sampler))
                .create(device, &label),
        );
    }

    /// Gets the bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }
}

/// The six face materials in slot order
pub struct MaterialSet {
    faces: [FaceMaterial; 6],
}

impl MaterialSet {
    pub fn new() -> Self {
        Self {
            faces: FACE_ORDER.map(FaceMaterial::new),
        }
    }

    /// Forwards shared shading values to every face
    pub fn set_shading(&mut self, shininess: f32, specular: [f32; 3]) {
        for material in &mut self.faces {
            material.shininess = shininess;
            material.specular = specular;
        }
    }

    pub fn material(&self, face: Face) -> &FaceMaterial {
        &self.faces[face.index()]
    }

    pub fn material_mut(&mut self, face: Face) -> &mut FaceMaterial {
        &mut self.faces[face.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceMaterial> {
        self.faces.iter()
    }

    /// Updates GPU resources for every face material
    pub fn update_gpu_resources(
        &mut self,
        layout: &BindGroupLayoutWithDesc,
        device: &Device,
        queue: &wgpu::Queue,
    ) {
        for material in &mut self.faces {
            material.update_gpu_resources(layout, device, queue);
        }
    }
}

impl Default for MaterialSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates the "no image yet" placeholder: a light grid on a gray field
pub fn placeholder_rgba() -> Vec<u8> {
    let size = PLACEHOLDER_SIZE;
    let mut data = vec![0u8; (size * size * 4) as usize];
    for y in 0..size {
        for x in 0..size {
            let on_grid = x % PLACEHOLDER_GRID == 0 || y % PLACEHOLDER_GRID == 0;
            let shade = if on_grid { 0xc0 } else { 0xe0 };
            let i = ((y * size + x) * 4) as usize;
            data[i] = shade;
            data[i + 1] = shade;
            data[i + 2] = shade;
            data[i + 3] = 0xff;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions_and_opacity() {
        let data = placeholder_rgba();
        assert_eq!(data.len(), (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize);
        assert!(data.chunks(4).all(|px| px[3] == 0xff));
    }

    #[test]
    fn test_placeholder_contains_grid_lines() {
        let data = placeholder_rgba();
        // First row lies on a grid line, second row does not.
        assert_eq!(data[0], 0xc0);
        let second_row = ((PLACEHOLDER_SIZE + 1) * 4) as usize;
        assert_eq!(data[second_row], 0xe0);
    }

    #[test]
    fn test_material_set_forwards_shading() {
        let mut set = MaterialSet::new();
        set.set_shading(64.0, [1.0, 0.5, 0.0]);
        for face in FACE_ORDER {
            assert_eq!(set.material(face).shininess, 64.0);
            assert_eq!(set.material(face).specular, [1.0, 0.5, 0.0]);
        }
    }

    #[test]
    fn test_material_set_slot_order() {
        let set = MaterialSet::new();
        for (i, material) in set.iter().enumerate() {
            assert_eq!(material.face, FACE_ORDER[i]);
        }
    }
}
