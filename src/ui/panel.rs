// src/ui/panel.rs
//! The studio control panel
//!
//! One window with a collapsing section per settings group, mirroring the
//! groups in [`crate::settings`]. Widgets mutate the settings records
//! directly; anything that needs GPU work (geometry rebuilds, image loads,
//! export) is emitted as a [`UiAction`] and applied by the app after the UI
//! pass, before the frame is rendered.

use imgui::TreeNodeFlags;

use crate::export;
use crate::gfx::geometry::{Face, FACE_ORDER};
use crate::settings::{
    BoxKind, CameraPreset, ExportQuality, StudioSettings, Unit, CORNER_RADIUS_RANGE, FOV_RANGE,
    SHININESS_RANGE,
};

/// Deferred work requested by the panel
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// A dimension, the unit, the box kind or corner rounding changed
    RebuildBox,
    /// The user pressed "Apply Viewpoint"
    ApplyCameraPreset,
    LoadFaceTexture { face: Face, path: String },
    LoadBackdrop { path: String },
    ClearBackdrop,
    ExportImage { path: String },
}

/// Widget state that is not part of the settings records
pub struct PanelState {
    pub texture_paths: [String; 6],
    pub backdrop_path: String,
    pub export_path: String,
    pub status: Option<String>,
}

impl PanelState {
    pub fn new(settings: &StudioSettings) -> Self {
        Self {
            texture_paths: Default::default(),
            backdrop_path: String::new(),
            export_path: export::default_file_name(settings),
            status: None,
        }
    }
}

/// Draws the studio panel and collects the actions it requests
pub fn studio_panel(
    ui: &imgui::Ui,
    settings: &mut StudioSettings,
    state: &mut PanelState,
    actions: &mut Vec<UiAction>,
    viewport: (u32, u32),
) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.3).clamp(360.0, 480.0);
    let panel_height = (display_size[1] - 40.0).max(400.0);

    ui.window("Box Shot Studio")
        .size([panel_width, panel_height], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            box_section(ui, settings, actions);
            surface_section(ui, settings);
            texture_section(ui, state, actions);
            lighting_section(ui, settings);
            camera_section(ui, settings, actions);
            background_section(ui, settings, state, actions);
            export_section(ui, settings, state, actions, viewport);

            if let Some(status) = &state.status {
                ui.separator();
                ui.text_wrapped(status);
            }
        });
}

fn box_section(ui: &imgui::Ui, settings: &mut StudioSettings, actions: &mut Vec<UiAction>) {
    if !ui.collapsing_header("Box Settings", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let previous_unit = settings.unit;
    if combo_enum(ui, "Units", &mut settings.unit, &Unit::ALL, Unit::label) {
        settings
            .box_settings
            .convert_unit(previous_unit, settings.unit);
        actions.push(UiAction::RebuildBox);
    }

    let mut kind = settings.box_settings.kind;
    if combo_enum(ui, "Box Type", &mut kind, &BoxKind::ALL, BoxKind::label) {
        settings.box_settings.apply_kind(kind, settings.unit);
        actions.push(UiAction::RebuildBox);
    }

    let symbol = settings.unit.symbol();
    let mut dimensions_edited = false;
    dimensions_edited |= ui
        .input_float(
            format!("Width ({symbol})##box_width"),
            &mut settings.box_settings.width,
        )
        .build();
    dimensions_edited |= ui
        .input_float(
            format!("Height ({symbol})##box_height"),
            &mut settings.box_settings.height,
        )
        .build();
    dimensions_edited |= ui
        .input_float(
            format!("Depth ({symbol})##box_depth"),
            &mut settings.box_settings.depth,
        )
        .build();

    let mut corners_changed =
        ui.checkbox("Rounded Corners", &mut settings.box_settings.rounded_corners);
    if settings.box_settings.rounded_corners {
        let (radius_min, radius_max) = CORNER_RADIUS_RANGE;
        corners_changed |= ui.slider(
            format!("Corner Radius ({symbol})##corner_radius"),
            radius_min,
            radius_max,
            &mut settings.box_settings.corner_radius,
        );
    }

    if dimensions_edited {
        // Hand-typed values need to be pulled back in range.
        settings.box_settings.clamp();
        settings.box_settings.kind = BoxKind::Custom;
    }
    if dimensions_edited || corners_changed {
        actions.push(UiAction::RebuildBox);
    }
}

fn surface_section(ui: &imgui::Ui, settings: &mut StudioSettings) {
    if !ui.collapsing_header("Surface", TreeNodeFlags::empty()) {
        return;
    }

    let (shininess_min, shininess_max) = SHININESS_RANGE;
    ui.slider(
        "Shininess",
        shininess_min,
        shininess_max,
        &mut settings.box_settings.shininess,
    );
    ui.color_edit3("Shine Color", &mut settings.box_settings.shine_color);
}

fn texture_section(ui: &imgui::Ui, state: &mut PanelState, actions: &mut Vec<UiAction>) {
    if !ui.collapsing_header("Face Textures", TreeNodeFlags::empty()) {
        return;
    }

    ui.text("Image path per face (PNG or JPEG):");
    ui.spacing();
    for face in FACE_ORDER {
        let slot = face.index();
        ui.input_text(
            format!("{}##texture_path_{slot}", face.label()),
            &mut state.texture_paths[slot],
        )
        .build();
        ui.same_line();
        if ui.button(format!("Load##texture_load_{slot}")) {
            let path = state.texture_paths[slot].trim().to_string();
            if path.is_empty() {
                state.status = Some(format!("Enter an image path for the {} face", face.label()));
            } else {
                actions.push(UiAction::LoadFaceTexture { face, path });
            }
        }
    }
}

fn lighting_section(ui: &imgui::Ui, settings: &mut StudioSettings) {
    if !ui.collapsing_header("Lighting", TreeNodeFlags::empty()) {
        return;
    }

    let lights = &mut settings.lights;

    ui.text("Ambient");
    ui.color_edit3("Color##ambient_color", &mut lights.ambient.color);
    ui.slider("Intensity##ambient_intensity", 0.0, 2.0, &mut lights.ambient.intensity);
    ui.spacing();

    ui.text("Directional");
    ui.color_edit3("Color##directional_color", &mut lights.directional.color);
    ui.slider(
        "Intensity##directional_intensity",
        0.0,
        2.0,
        &mut lights.directional.intensity,
    );
    ui.spacing();

    ui.text("Point (follows camera)");
    ui.color_edit3("Color##point_color", &mut lights.point.color);
    ui.slider("Intensity##point_intensity", 0.0, 5.0, &mut lights.point.intensity);
    ui.slider("Offset X##point_x", -10.0, 10.0, &mut lights.point.offset[0]);
    ui.slider("Offset Y##point_y", -10.0, 10.0, &mut lights.point.offset[1]);
    ui.slider("Offset Z##point_z", -10.0, 10.0, &mut lights.point.offset[2]);
    ui.checkbox("Lock Light Position", &mut lights.point.lock_position);
}

fn camera_section(ui: &imgui::Ui, settings: &mut StudioSettings, actions: &mut Vec<UiAction>) {
    if !ui.collapsing_header("Camera", TreeNodeFlags::empty()) {
        return;
    }

    let (fov_min, fov_max) = FOV_RANGE;
    ui.slider(
        "Field of View",
        fov_min,
        fov_max,
        &mut settings.camera.fov_degrees,
    );

    combo_enum(
        ui,
        "Viewpoint",
        &mut settings.camera.preset,
        &CameraPreset::ALL,
        CameraPreset::label,
    );
    if ui.button("Apply Viewpoint") {
        actions.push(UiAction::ApplyCameraPreset);
    }
}

fn background_section(
    ui: &imgui::Ui,
    settings: &mut StudioSettings,
    state: &mut PanelState,
    actions: &mut Vec<UiAction>,
) {
    if !ui.collapsing_header("Background", TreeNodeFlags::empty()) {
        return;
    }

    ui.color_edit3("Color##background_color", &mut settings.background.color);
    ui.checkbox("Transparent", &mut settings.background.transparent);

    ui.input_text("Image##backdrop_path", &mut state.backdrop_path)
        .build();
    ui.same_line();
    if ui.button("Load##backdrop_load") {
        let path = state.backdrop_path.trim().to_string();
        if path.is_empty() {
            state.status = Some("Enter a backdrop image path".to_string());
        } else {
            actions.push(UiAction::LoadBackdrop { path });
        }
    }
    if settings.background.use_image && ui.button("Clear Image##backdrop_clear") {
        actions.push(UiAction::ClearBackdrop);
    }
}

fn export_section(
    ui: &imgui::Ui,
    settings: &mut StudioSettings,
    state: &mut PanelState,
    actions: &mut Vec<UiAction>,
    viewport: (u32, u32),
) {
    if !ui.collapsing_header("Export", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    if ui
        .input_scalar("Image Width (px)", &mut settings.export.width)
        .build()
    {
        // Height follows the viewport aspect ratio, like the preview does.
        settings.export.derive_height(viewport.0, viewport.1);
    }
    ui.text(format!("Image Height: {} px", settings.export.height));

    combo_enum(
        ui,
        "Quality",
        &mut settings.export.quality,
        &ExportQuality::ALL,
        ExportQuality::label,
    );

    ui.input_text("File Name", &mut state.export_path).build();
    ui.same_line();
    if ui.button("Default##export_default_name") {
        state.export_path = export::default_file_name(settings);
    }

    if ui.button("Export PNG") {
        let mut path = state.export_path.trim().to_string();
        if path.is_empty() {
            path = export::default_file_name(settings);
            state.export_path = path.clone();
        }
        actions.push(UiAction::ExportImage { path });
    }
}

/// Combo box over a slice of enum values, labelled by `label_fn`
fn combo_enum<T: Copy + PartialEq>(
    ui: &imgui::Ui,
    label: &str,
    current: &mut T,
    all: &[T],
    label_fn: fn(T) -> &'static str,
) -> bool {
    let mut index = all.iter().position(|value| *value == *current).unwrap_or(0);
    let labels: Vec<&str> = all.iter().map(|value| label_fn(*value)).collect();
    if ui.combo_simple_string(label, &mut index, &labels) {
        *current = all[index];
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_state_prefills_export_name() {
        let settings = StudioSettings::default();
        let state = PanelState::new(&settings);
        assert_eq!(state.export_path, "box-shot-200x300x50mm.png");
        assert!(state.texture_paths.iter().all(|p| p.is_empty()));
    }
}
