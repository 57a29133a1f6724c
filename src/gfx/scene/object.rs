//! Mesh storage and draw helpers
//!
//! A [`Mesh`] owns CPU-side vertex data plus the optional GPU buffers, so a
//! mesh can be built before the device exists and uploaded later. The
//! [`DrawMesh`] trait extends `wgpu::RenderPass` with mesh draw calls the
//! way the render engine expects to issue them.

use wgpu::Device;

use crate::gfx::geometry::GeometryData;

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub vertex_count: u32,
}

impl Mesh {
    /// Builds a mesh from generated geometry. GPU buffers are created on the
    /// first `upload` call.
    pub fn from_geometry(data: &GeometryData) -> Self {
        let vertices: Vec<Vertex3D> = (0..data.vertices.len())
            .map(|i| Vertex3D {
                position: data.vertices[i],
                normal: data.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: data.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        Self {
            vertex_count: vertices.len() as u32,
            index_count: data.indices.len() as u32,
            vertices,
            indices: data.indices.clone(),
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// Creates (or recreates) the vertex and index buffers for this mesh
    pub fn upload(&mut self, device: &Device) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Face Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Face Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_box_faces, FACE_ORDER};
    use cgmath::Vector3;

    #[test]
    fn test_mesh_from_geometry_counts() {
        let faces = generate_box_faces(Vector3::new(2.0, 3.0, 0.5), 0.0);
        for (face, geometry) in FACE_ORDER.iter().zip(&faces) {
            let mesh = Mesh::from_geometry(geometry);
            assert_eq!(mesh.vertex_count, 4, "{:?}", face);
            assert_eq!(mesh.index_count, 6, "{:?}", face);
            assert!(!mesh.is_uploaded());
        }
    }
}
