//! Engine data structures: models, textures, transforms and render targets.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds the model transform and its per-view GPU record
//! - `tessellation` refines mesh geometry for the tessellation view
//! - `framebuffer` is the off-screen colour/depth target fed back into the scene

pub mod framebuffer;
pub mod instance;
pub mod model;
pub mod tessellation;
pub mod texture;
