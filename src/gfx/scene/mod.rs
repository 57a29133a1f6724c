//! # Scene Management
//!
//! The retained scene the UI writes into: the box (six face plates), the
//! per-face materials, the light rig and the orbit camera. The UI never
//! touches GPU state directly: it mutates settings, and [`Scene::sync`]
//! forwards them here each frame.

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawMesh, Mesh};
pub use scene::{FacePlate, Scene};
pub use vertex::Vertex3D;
