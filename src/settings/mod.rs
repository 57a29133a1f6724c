//! # Studio Settings
//!
//! Plain configuration records, one per control group in the studio panel.
//! Each field maps 1:1 to a widget and to a property on a scene object
//! (mesh, material, light, camera). The records are created at startup with
//! the defaults below, mutated on input events, and discarded on exit;
//! nothing here is persisted.
//!
//! Values are clamped on the way in so out-of-range widget input never
//! reaches the scene.

pub mod presets;
pub mod units;

pub use presets::{BoxKind, CameraPreset};
pub use units::Unit;

use cgmath::Vector3;

/// Allowed range for box width/height/depth, in the active unit
pub const DIMENSION_RANGE: (f32, f32) = (1.0, 500.0);
/// Allowed range for the corner radius, in the active unit
pub const CORNER_RADIUS_RANGE: (f32, f32) = (1.0, 50.0);
/// Allowed range for material shininess
pub const SHININESS_RANGE: (f32, f32) = (0.0, 128.0);
/// Allowed range for the camera field of view, in degrees
pub const FOV_RANGE: (f32, f32) = (10.0, 120.0);
/// Allowed range for the export image width, in pixels
pub const EXPORT_WIDTH_RANGE: (u32, u32) = (16, 8192);

/// Box dimensions and surface shading shared by all six faces
#[derive(Debug, Clone)]
pub struct BoxSettings {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub shininess: f32,
    pub shine_color: [f32; 3],
    pub kind: BoxKind,
    pub rounded_corners: bool,
    pub corner_radius: f32,
}

impl Default for BoxSettings {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 300.0,
            depth: 50.0,
            shininess: 30.0,
            shine_color: [1.0, 1.0, 1.0],
            kind: BoxKind::Standard,
            rounded_corners: false,
            corner_radius: 10.0,
        }
    }
}

impl BoxSettings {
    /// Clamps all numeric fields into their allowed ranges
    pub fn clamp(&mut self) {
        let (lo, hi) = DIMENSION_RANGE;
        self.width = self.width.clamp(lo, hi);
        self.height = self.height.clamp(lo, hi);
        self.depth = self.depth.clamp(lo, hi);
        let (rlo, rhi) = CORNER_RADIUS_RANGE;
        self.corner_radius = self.corner_radius.clamp(rlo, rhi);
        let (slo, shi) = SHININESS_RANGE;
        self.shininess = self.shininess.clamp(slo, shi);
    }

    /// Overwrites dimensions from the kind's preset table.
    ///
    /// `Custom` carries no dimensions and leaves the current values alone.
    pub fn apply_kind(&mut self, kind: BoxKind, unit: Unit) {
        self.kind = kind;
        if let Some([w, h, d]) = kind.dimensions(unit) {
            self.width = w;
            self.height = h;
            self.depth = d;
        }
    }

    /// Converts stored dimensions between units
    pub fn convert_unit(&mut self, from: Unit, to: Unit) {
        self.width = units::convert(self.width, from, to);
        self.height = units::convert(self.height, from, to);
        self.depth = units::convert(self.depth, from, to);
        self.corner_radius = units::convert(self.corner_radius, from, to);
    }

    /// Box dimensions in world units
    pub fn world_dimensions(&self, unit: Unit) -> Vector3<f32> {
        Vector3::new(
            unit.to_world(self.width),
            unit.to_world(self.height),
            unit.to_world(self.depth),
        )
    }

    /// Corner radius in world units, or zero when rounding is off.
    ///
    /// The radius is capped at half the smallest dimension so the rounded
    /// profile never folds through itself.
    pub fn world_corner_radius(&self, unit: Unit) -> f32 {
        if !self.rounded_corners {
            return 0.0;
        }
        let dims = self.world_dimensions(unit);
        let max_radius = 0.5 * dims.x.min(dims.y).min(dims.z);
        unit.to_world(self.corner_radius).min(max_radius)
    }
}

/// Ambient light: flat fill applied to every surface
#[derive(Debug, Clone)]
pub struct AmbientSettings {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Directional key light from a fixed position
#[derive(Debug, Clone)]
pub struct DirectionalSettings {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Point highlight light riding the camera at a configurable offset
#[derive(Debug, Clone)]
pub struct PointSettings {
    pub color: [f32; 3],
    pub intensity: f32,
    pub offset: [f32; 3],
    /// When set, the light stops following the camera and stays at its
    /// current world position.
    pub lock_position: bool,
}

#[derive(Debug, Clone)]
pub struct LightSettings {
    pub ambient: AmbientSettings,
    pub directional: DirectionalSettings,
    pub point: PointSettings,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient: AmbientSettings {
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
            },
            directional: DirectionalSettings {
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
            },
            point: PointSettings {
                color: [1.0, 1.0, 1.0],
                intensity: 0.7,
                offset: [2.0, 3.0, 2.0],
                lock_position: false,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub preset: CameraPreset,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            preset: CameraPreset::FrontRight,
        }
    }
}

/// Backdrop behind the box: solid color, transparent, or an image
#[derive(Debug, Clone)]
pub struct BackgroundSettings {
    pub color: [f32; 3],
    /// Transparency wins over both color and image; exported PNGs keep
    /// alpha 0 where no geometry was drawn.
    pub transparent: bool,
    /// Set once a backdrop image has been loaded into the renderer
    pub use_image: bool,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            transparent: false,
            use_image: false,
        }
    }
}

/// PNG compression effort for exported images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportQuality {
    Low,
    Medium,
    High,
}

impl ExportQuality {
    pub const ALL: [ExportQuality; 3] =
        [ExportQuality::Low, ExportQuality::Medium, ExportQuality::High];

    pub fn label(self) -> &'static str {
        match self {
            ExportQuality::Low => "Low (fast)",
            ExportQuality::Medium => "Medium",
            ExportQuality::High => "High (best)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub quality: ExportQuality,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            quality: ExportQuality::High,
        }
    }
}

impl ExportSettings {
    /// Re-derives the export height from the viewport aspect ratio,
    /// clamping the width into range first.
    ///
    /// The height is capped at the same upper bound as the width so a
    /// portrait viewport cannot push the render target past texture limits.
    pub fn derive_height(&mut self, viewport_width: u32, viewport_height: u32) {
        let (lo, hi) = EXPORT_WIDTH_RANGE;
        self.width = self.width.clamp(lo, hi);
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }
        let aspect = viewport_width as f32 / viewport_height as f32;
        self.height = ((self.width as f32 / aspect).round() as u32).clamp(1, hi);
    }
}

/// All studio settings, grouped the way the panel groups them
#[derive(Debug, Clone, Default)]
pub struct StudioSettings {
    pub unit: Unit,
    pub box_settings: BoxSettings,
    pub lights: LightSettings,
    pub camera: CameraSettings,
    pub background: BackgroundSettings,
    pub export: ExportSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimension_clamping() {
        let mut settings = BoxSettings {
            width: 0.0,
            height: 9999.0,
            corner_radius: 80.0,
            shininess: 200.0,
            ..Default::default()
        };
        settings.clamp();
        assert_eq!(settings.width, 1.0);
        assert_eq!(settings.height, 500.0);
        assert_eq!(settings.corner_radius, 50.0);
        assert_eq!(settings.shininess, 128.0);
    }

    #[test]
    fn test_apply_kind_overwrites_dimensions() {
        let mut settings = BoxSettings::default();
        settings.apply_kind(BoxKind::Dvd, Unit::Millimeters);
        assert_eq!(
            [settings.width, settings.height, settings.depth],
            [135.0, 190.0, 15.0]
        );
    }

    #[test]
    fn test_apply_custom_keeps_dimensions() {
        let mut settings = BoxSettings::default();
        settings.width = 123.0;
        settings.apply_kind(BoxKind::Custom, Unit::Millimeters);
        assert_eq!(settings.width, 123.0);
        assert_eq!(settings.kind, BoxKind::Custom);
    }

    #[test]
    fn test_convert_unit_touches_all_dimension_fields() {
        let mut settings = BoxSettings::default();
        settings.convert_unit(Unit::Millimeters, Unit::Centimeters);
        assert_relative_eq!(settings.width, 20.0);
        assert_relative_eq!(settings.height, 30.0);
        assert_relative_eq!(settings.depth, 5.0);
        assert_relative_eq!(settings.corner_radius, 1.0);
    }

    #[test]
    fn test_world_dimensions_default_box() {
        let settings = BoxSettings::default();
        let dims = settings.world_dimensions(Unit::Millimeters);
        assert_relative_eq!(dims.x, 2.0);
        assert_relative_eq!(dims.y, 3.0);
        assert_relative_eq!(dims.z, 0.5);
    }

    #[test]
    fn test_world_corner_radius_respects_toggle_and_cap() {
        let mut settings = BoxSettings::default();
        assert_eq!(settings.world_corner_radius(Unit::Millimeters), 0.0);

        settings.rounded_corners = true;
        settings.corner_radius = 10.0;
        assert_relative_eq!(settings.world_corner_radius(Unit::Millimeters), 0.1);

        // Radius larger than half the depth is capped.
        settings.corner_radius = 50.0;
        assert_relative_eq!(settings.world_corner_radius(Unit::Millimeters), 0.25);
    }

    #[test]
    fn test_export_height_follows_viewport_aspect() {
        let mut export = ExportSettings::default();
        export.width = 1200;
        export.derive_height(1600, 900);
        assert_eq!(export.height, 675);
    }

    #[test]
    fn test_export_width_clamped_before_derivation() {
        let mut export = ExportSettings::default();
        export.width = 4;
        export.derive_height(100, 100);
        assert_eq!(export.width, 16);
        assert_eq!(export.height, 16);
    }
}
