//! Render pipelines, one per shader view, and the bind group layouts they share.
//!
//! Bind group conventions:
//!
//! - group 0: material (diffuse, normal, coefficients), or the environment cube map
//!   for the reflection and skybox pipelines
//! - group 1: camera
//! - group 2: light
//! - group 3: shading parameters

use crate::{render::ShaderView, resources::texture::diffuse_normal_layout};

pub mod basic;
pub mod light;
pub mod normal;
pub mod reflection;
pub mod shading;
pub mod skybox;
pub mod static_lit;
pub mod tessellation;

/// Bind group layouts, created once per device.
#[derive(Debug)]
pub struct Layouts {
    pub material: wgpu::BindGroupLayout,
    pub camera: wgpu::BindGroupLayout,
    pub light: wgpu::BindGroupLayout,
    pub shading: wgpu::BindGroupLayout,
    pub environment: wgpu::BindGroupLayout,
}

impl Layouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            material: diffuse_normal_layout(device),
            camera: uniform_layout(device, "camera_bind_group_layout"),
            light: light::mk_bind_group_layout(device),
            shading: shading::mk_bind_group_layout(device),
            environment: skybox::mk_environment_layout(device),
        }
    }
}

/// A single uniform buffer at binding 0, visible to both stages.
pub fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

/// Every render pipeline of the demo.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub static_lit: wgpu::RenderPipeline,
    pub normal: wgpu::RenderPipeline,
    pub tessellation: wgpu::RenderPipeline,
    pub reflection: wgpu::RenderPipeline,
    pub skybox: wgpu::RenderPipeline,
}

impl Pipelines {
    /// Build every pipeline for targets of `format`.
    ///
    /// The off-screen framebuffer uses the same format as the surface, so one set of
    /// pipelines serves both.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, layouts: &Layouts) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(device, format, layouts),
            static_lit: static_lit::mk_static_pipeline(device, format, layouts),
            normal: normal::mk_normal_pipeline(device, format, layouts),
            tessellation: tessellation::mk_tessellation_pipeline(device, format, layouts),
            reflection: reflection::mk_reflection_pipeline(device, format, layouts),
            skybox: skybox::mk_skybox_pipeline(device, format, layouts),
        }
    }

    pub fn get(&self, view: ShaderView) -> &wgpu::RenderPipeline {
        match view {
            ShaderView::Basic => &self.basic,
            ShaderView::Static => &self.static_lit,
            ShaderView::Normal => &self.normal,
            ShaderView::Tessellation => &self.tessellation,
            ShaderView::Reflection => &self.reflection,
        }
    }
}
