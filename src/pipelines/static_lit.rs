use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::{
        Layouts,
        basic::{depth_state, mk_render_pipeline},
    },
};

/// Normal-mapped Blinn-Phong lighting from the scene light, using the material's
/// coefficients and the configured gamma.
pub fn mk_static_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layouts: &Layouts,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Static Pipeline Layout"),
        bind_group_layouts: &[
            &layouts.material,
            &layouts.camera,
            &layouts.light,
            &layouts.shading,
        ],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Static Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("static_lit.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        format,
        Some(wgpu::BlendState::REPLACE),
        Some(depth_state(true, wgpu::CompareFunction::Less)),
        Some(wgpu::Face::Back),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
