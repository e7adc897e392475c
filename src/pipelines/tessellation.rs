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

/// Lit view of the subdivided geometry.
///
/// The vertex stage samples the diffuse map and pushes each vertex along its normal
/// by `displacement * (luminance - 0.5)`, so the material layout has to expose the
/// diffuse texture to the vertex stage.
pub fn mk_tessellation_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layouts: &Layouts,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Tessellation Pipeline Layout"),
        bind_group_layouts: &[
            &layouts.material,
            &layouts.camera,
            &layouts.light,
            &layouts.shading,
        ],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Tessellation Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("tessellation.wgsl").into()),
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
