//! shaderbox
//!
//! A small real-time rendering demo built on wgpu: one set of textured meshes is
//! loaded once and drawn through several shader views side by side (basic, lit,
//! normals, tessellated, reflective), next to an off-screen framebuffer fed back
//! into the scene, a skybox, an FPS overlay and minimal positional audio.
//!
//! High-level modules
//! - `config`: layered application configuration
//! - `camera`: camera types, controller and uniforms for view/projection
//! - `context`: window and GPU context that owns device/queue/pipelines
//! - `data_structures`: meshes, materials, transforms, textures, framebuffer
//! - `pipelines`: one render pipeline per shader view plus shared uniforms
//! - `resources`: loading models, textures, the scene file and the skybox
//! - `render`: the shader views and the fixed pass order of a frame
//! - `scene`: loaded scene and frame execution
//! - `audio`: listener, sources and distance attenuation
//! - `hud`: FPS counter and text overlay
//! - `flow`: winit application handler and `run()`
//!

pub mod audio;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod hud;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use flow::run;
