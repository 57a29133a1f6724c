//! GPU resource management: materials, textures and global bindings

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, LightRig};
pub use material::{FaceMaterial, MaterialSet};
pub use texture_resource::TextureResource;
