// src/lib.rs
//! Box Shot Studio
//!
//! A native 3D packaging-mockup tool built on wgpu and winit: configure a
//! rectangular box, apply per-face textures, lighting and camera presets,
//! and export a rendered PNG.

pub mod app;
pub mod export;
pub mod gfx;
pub mod prelude;
pub mod settings;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::BoxShotApp;

/// Creates a default studio application instance
pub fn default() -> BoxShotApp {
    pollster::block_on(BoxShotApp::new())
}
