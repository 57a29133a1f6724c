use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::{generate_box_faces, Face},
    resources::{LightRig, MaterialSet},
    scene::object::Mesh,
};
use crate::settings::StudioSettings;

/// One side of the box: the face slot plus its mesh
pub struct FacePlate {
    pub face: Face,
    pub mesh: Mesh,
}

/// Main scene: the box faces, their materials, the light rig and the camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub faces: Vec<FacePlate>,
    pub materials: MaterialSet,
    pub lights: LightRig,
}

impl Scene {
    /// Creates an empty scene; the box is built on the first `rebuild_box`
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            faces: Vec::new(),
            materials: MaterialSet::new(),
            lights: LightRig::default(),
        }
    }

    /// Rebuilds the six face meshes from the current box settings and
    /// uploads them to the GPU.
    ///
    /// Called whenever a dimension, the unit, the box kind or the corner
    /// rounding changes.
    pub fn rebuild_box(&mut self, device: &Device, settings: &StudioSettings) {
        let dimensions = settings.box_settings.world_dimensions(settings.unit);
        let radius = settings.box_settings.world_corner_radius(settings.unit);

        log::debug!(
            "rebuilding box: {:.2}x{:.2}x{:.2} world units, corner radius {:.3}",
            dimensions.x,
            dimensions.y,
            dimensions.z,
            radius
        );

        let geometry = generate_box_faces(dimensions, radius);
        self.faces = crate::gfx::geometry::FACE_ORDER
            .iter()
            .zip(geometry)
            .map(|(face, data)| {
                let mut mesh = Mesh::from_geometry(&data);
                mesh.upload(device);
                FacePlate { face: *face, mesh }
            })
            .collect();
    }

    /// Forwards the per-frame settings into the scene objects: material
    /// shading, camera field of view, and the light rig (point light riding
    /// the camera eye unless locked).
    pub fn sync(&mut self, settings: &StudioSettings) {
        self.materials.set_shading(
            settings.box_settings.shininess,
            settings.box_settings.shine_color,
        );
        self.camera_manager
            .camera
            .set_fov_degrees(settings.camera.fov_degrees);
        self.lights
            .sync(&settings.lights, self.camera_manager.camera.eye);
    }

    /// Updates the camera matrices
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn triangle_count(&self) -> u32 {
        self.faces.iter().map(|plate| plate.mesh.index_count / 3).sum()
    }
}
