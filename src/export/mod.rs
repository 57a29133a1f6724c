//! PNG export
//!
//! Renders the scene offscreen at the requested export size and writes the
//! result as a PNG. The sequence mirrors what the viewport would show:
//! remember the viewport aspect ratio, re-project the camera for the export
//! dimensions, render one frame, then restore the viewport projection.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::gfx::rendering::{CaptureError, RenderEngine};
use crate::gfx::scene::Scene;
use crate::settings::{ExportQuality, StudioSettings};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("offscreen capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renders the scene at the configured export size and writes a PNG.
///
/// The viewport camera projection is restored before returning, even though
/// the render happened at the export aspect ratio.
///
/// # Returns
/// The path the image was written to
pub fn export_png(
    engine: &mut RenderEngine,
    scene: &mut Scene,
    settings: &StudioSettings,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    let (viewport_width, viewport_height) = engine.surface_size();
    let width = settings.export.width;
    let height = settings.export.height.max(1);

    log::info!("exporting {}x{} PNG to {}", width, height, path.display());

    scene.camera_manager.camera.resize_projection(width, height);
    scene.update();
    engine.update(scene.camera_manager.camera.uniform, &scene.lights);

    let result = engine.render_offscreen(scene, &settings.background, width, height);

    scene
        .camera_manager
        .camera
        .resize_projection(viewport_width, viewport_height);
    scene.update();
    engine.update(scene.camera_manager.camera.uniform, &scene.lights);

    let frame = result?;

    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(
        writer,
        compression_for(settings.export.quality),
        FilterType::Adaptive,
    );
    encoder.write_image(
        &frame.rgba,
        frame.width,
        frame.height,
        ExtendedColorType::Rgba8,
    )?;

    Ok(path.to_path_buf())
}

/// Default export file name, e.g. `box-shot-200x300x50mm.png`
pub fn default_file_name(settings: &StudioSettings) -> String {
    let box_settings = &settings.box_settings;
    format!(
        "box-shot-{}x{}x{}{}.png",
        format_dimension(box_settings.width),
        format_dimension(box_settings.height),
        format_dimension(box_settings.depth),
        settings.unit.symbol()
    )
}

fn compression_for(quality: ExportQuality) -> CompressionType {
    match quality {
        ExportQuality::Low => CompressionType::Fast,
        ExportQuality::Medium => CompressionType::Default,
        ExportQuality::High => CompressionType::Best,
    }
}

/// Formats a dimension without a trailing `.0` for whole values
fn format_dimension(value: f32) -> String {
    if value.fract().abs() < 1e-3 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{StudioSettings, Unit};

    #[test]
    fn test_default_file_name_whole_dimensions() {
        let settings = StudioSettings::default();
        assert_eq!(default_file_name(&settings), "box-shot-200x300x50mm.png");
    }

    #[test]
    fn test_default_file_name_fractional_dimensions() {
        let mut settings = StudioSettings::default();
        settings.unit = Unit::Centimeters;
        settings.box_settings.width = 13.5;
        settings.box_settings.height = 19.0;
        settings.box_settings.depth = 1.5;
        assert_eq!(default_file_name(&settings), "box-shot-13.5x19x1.5cm.png");
    }

    #[test]
    fn test_quality_maps_to_compression_effort() {
        assert!(matches!(
            compression_for(ExportQuality::Low),
            CompressionType::Fast
        ));
        assert!(matches!(
            compression_for(ExportQuality::High),
            CompressionType::Best
        ));
    }
}
