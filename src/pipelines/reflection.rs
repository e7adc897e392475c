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

/// Mirror-like models reflecting the skybox cube map. Materials are not bound.
pub fn mk_reflection_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layouts: &Layouts,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Reflection Pipeline Layout"),
        bind_group_layouts: &[&layouts.environment, &layouts.camera],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Reflection Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("reflection.wgsl").into()),
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
