//! # Prelude
//!
//! Re-exports the types most applications touch, so a binary can start with
//! a single `use boxshot::prelude::*;`.

pub use crate::app::BoxShotApp;
pub use crate::default;

pub use crate::gfx::geometry::Face;
pub use crate::gfx::scene::Scene;
pub use crate::settings::{
    BoxKind, BoxSettings, CameraPreset, ExportQuality, StudioSettings, Unit,
};

pub use cgmath::Vector3;
