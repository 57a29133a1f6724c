//! Box face meshes
//!
//! The mockup box is built as six independent face meshes so every side can
//! carry its own texture. Faces are generated as grids in the face plane;
//! when a corner radius is set the grid is subdivided and each vertex is
//! projected onto the rounded-box surface (inner box shrunk by the radius,
//! vertices pushed back out along the offset direction).

use cgmath::{InnerSpace, Vector3};

use super::GeometryData;

/// Grid subdivisions per face when corners are rounded
const ROUNDED_SEGMENTS: u32 = 4;

/// One side of the box.
///
/// [`FACE_ORDER`] fixes the material slot order: right, left, top, bottom,
/// front, back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

/// Material slot order for the six faces
pub const FACE_ORDER: [Face; 6] = [
    Face::Right,
    Face::Left,
    Face::Top,
    Face::Bottom,
    Face::Front,
    Face::Back,
];

impl Face {
    pub fn label(self) -> &'static str {
        match self {
            Face::Right => "Right",
            Face::Left => "Left",
            Face::Top => "Top",
            Face::Bottom => "Bottom",
            Face::Front => "Front",
            Face::Back => "Back",
        }
    }

    pub fn index(self) -> usize {
        FACE_ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Outward normal of the flat face
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Face::Right => Vector3::unit_x(),
            Face::Left => -Vector3::unit_x(),
            Face::Top => Vector3::unit_y(),
            Face::Bottom => -Vector3::unit_y(),
            Face::Front => Vector3::unit_z(),
            Face::Back => -Vector3::unit_z(),
        }
    }

    /// In-plane basis (u direction, v direction).
    ///
    /// Chosen so that tangent x bitangent equals the outward normal, which
    /// keeps the counter-clockwise winding consistent across faces.
    fn basis(self) -> (Vector3<f32>, Vector3<f32>) {
        match self {
            Face::Right => (-Vector3::unit_z(), Vector3::unit_y()),
            Face::Left => (Vector3::unit_z(), Vector3::unit_y()),
            Face::Top => (Vector3::unit_x(), -Vector3::unit_z()),
            Face::Bottom => (Vector3::unit_x(), Vector3::unit_z()),
            Face::Front => (Vector3::unit_x(), Vector3::unit_y()),
            Face::Back => (-Vector3::unit_x(), Vector3::unit_y()),
        }
    }
}

/// Generates the six face meshes for a box centered at the origin.
///
/// # Arguments
/// * `dimensions` - Full box extents in world units (width, height, depth)
/// * `corner_radius` - Rounding radius in world units; zero produces sharp
///   edges with a single quad per face
///
/// # Returns
/// Face geometry in [`FACE_ORDER`] slot order
pub fn generate_box_faces(dimensions: Vector3<f32>, corner_radius: f32) -> [GeometryData; 6] {
    let half = dimensions * 0.5;
    let radius = corner_radius.clamp(0.0, half.x.min(half.y).min(half.z));
    let segments = if radius > 0.0 { ROUNDED_SEGMENTS } else { 1 };

    FACE_ORDER.map(|face| generate_face(face, half, radius, segments))
}

fn generate_face(face: Face, half: Vector3<f32>, radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let normal = face.normal();
    let (tangent, bitangent) = face.basis();
    let extent_n = half_along(normal, half);
    let extent_t = half_along(tangent, half);
    let extent_b = half_along(bitangent, half);

    let row = segments + 1;
    for v in 0..=segments {
        let fv = v as f32 / segments as f32;
        for u in 0..=segments {
            let fu = u as f32 / segments as f32;

            let flat = normal * extent_n
                + tangent * (fu * 2.0 - 1.0) * extent_t
                + bitangent * (fv * 2.0 - 1.0) * extent_b;

            let (position, vertex_normal) = if radius > 0.0 {
                round_vertex(flat, half, radius, normal)
            } else {
                (flat, normal)
            };

            data.vertices.push(position.into());
            data.normals.push(vertex_normal.into());
            // Image row zero is the top of the texture.
            data.tex_coords.push([fu, 1.0 - fv]);
        }
    }

    for v in 0..segments {
        for u in 0..segments {
            let i = v * row + u;
            data.indices
                .extend_from_slice(&[i, i + 1, i + 1 + row, i, i + 1 + row, i + row]);
        }
    }

    data
}

/// Projects a flat-face vertex onto the rounded-box surface.
///
/// The box is treated as an inner box shrunk by `radius` on every axis; any
/// vertex outside the inner box is pushed to distance `radius` along its
/// offset direction, which also becomes the shading normal.
fn round_vertex(
    flat: Vector3<f32>,
    half: Vector3<f32>,
    radius: f32,
    face_normal: Vector3<f32>,
) -> (Vector3<f32>, Vector3<f32>) {
    let inner = half.map(|h| (h - radius).max(0.0));
    let clamped = Vector3::new(
        flat.x.clamp(-inner.x, inner.x),
        flat.y.clamp(-inner.y, inner.y),
        flat.z.clamp(-inner.z, inner.z),
    );
    let offset = flat - clamped;
    let length = offset.magnitude();
    if length > 1e-6 {
        let direction = offset / length;
        (clamped + direction * radius, direction)
    } else {
        (flat, face_normal)
    }
}

fn half_along(direction: Vector3<f32>, half: Vector3<f32>) -> f32 {
    (direction.x.abs() * half.x + direction.y.abs() * half.y + direction.z.abs() * half.z).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const DIMS: Vector3<f32> = Vector3::new(2.0, 3.0, 0.5);

    #[test]
    fn test_sharp_box_counts() {
        let faces = generate_box_faces(DIMS, 0.0);
        for face in &faces {
            assert_eq!(face.vertex_count(), 4);
            assert_eq!(face.triangle_count(), 2);
        }
    }

    #[test]
    fn test_rounded_box_counts() {
        let faces = generate_box_faces(DIMS, 0.1);
        let row = ROUNDED_SEGMENTS as usize + 1;
        for face in &faces {
            assert_eq!(face.vertex_count(), row * row);
            assert_eq!(
                face.triangle_count(),
                (ROUNDED_SEGMENTS * ROUNDED_SEGMENTS * 2) as usize
            );
        }
    }

    #[test]
    fn test_sharp_faces_span_half_extents() {
        let faces = generate_box_faces(DIMS, 0.0);
        let mut max = [0.0f32; 3];
        for face in &faces {
            for vertex in &face.vertices {
                for axis in 0..3 {
                    max[axis] = max[axis].max(vertex[axis].abs());
                }
            }
        }
        assert_eq!(max, [1.0, 1.5, 0.25]);
    }

    #[test]
    fn test_normals_point_outward() {
        for (face, geometry) in FACE_ORDER.iter().zip(generate_box_faces(DIMS, 0.1)) {
            for (vertex, normal) in geometry.vertices.iter().zip(&geometry.normals) {
                let n = Vector3::from(*normal);
                assert!(
                    n.dot(Vector3::from(*vertex)) > 0.0,
                    "inward normal on {:?} at {:?}",
                    face,
                    vertex
                );
                assert!((n.magnitude() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_rounded_vertices_stay_inside_box() {
        let faces = generate_box_faces(DIMS, 0.2);
        for face in &faces {
            for vertex in &face.vertices {
                assert!(vertex[0].abs() <= 1.0 + 1e-4);
                assert!(vertex[1].abs() <= 1.5 + 1e-4);
                assert!(vertex[2].abs() <= 0.25 + 1e-4);
            }
        }
    }

    #[test]
    fn test_radius_capped_at_half_smallest_dimension() {
        // Requested radius exceeds half the depth; corners must not fold
        // through the opposite side.
        let faces = generate_box_faces(DIMS, 5.0);
        for face in &faces {
            for vertex in &face.vertices {
                assert!(vertex[2].abs() <= 0.25 + 1e-4);
            }
        }
    }

    #[test]
    fn test_tex_coords_cover_unit_square() {
        let faces = generate_box_faces(DIMS, 0.0);
        for face in &faces {
            for uv in &face.tex_coords {
                assert!((0.0..=1.0).contains(&uv[0]));
                assert!((0.0..=1.0).contains(&uv[1]));
            }
        }
    }

    #[test]
    fn test_face_order_matches_material_slots() {
        assert_eq!(Face::Right.index(), 0);
        assert_eq!(Face::Back.index(), 5);
    }
}
