//! # Graphics Module
//!
//! Everything between the settings records and the pixels: the orbit camera,
//! box face geometry, per-face materials, the light rig, and the wgpu render
//! engine with its offscreen export path.
//!
//! The UI layer never calls into here directly: it mutates settings, and
//! the app forwards them through [`scene::Scene::sync`] each frame.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
