use wgpu::util::DeviceExt;

/// Parameters shared by the lit views: gamma and the tessellation displacement.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadingUniform {
    pub gamma: f32,
    pub displacement: f32,
    _padding: [f32; 2],
}

impl ShadingUniform {
    /// A non-positive gamma falls back to 2.2, which leaves the sRGB output untouched.
    pub fn new(gamma: f32, displacement: f32) -> Self {
        Self {
            gamma: if gamma > 0.0 { gamma } else { 2.2 },
            displacement,
            _padding: [0.0; 2],
        }
    }
}

impl Default for ShadingUniform {
    fn default() -> Self {
        Self::new(2.2, 0.1)
    }
}

/// Shading uniforms for models with and without gamma correction.
#[derive(Debug)]
pub struct ShadingResources {
    pub uniform: ShadingUniform,
    corrected: wgpu::BindGroup,
    uncorrected: wgpu::BindGroup,
}

impl ShadingResources {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, uniform: ShadingUniform) -> Self {
        // Gamma 2.2 is the identity on the sRGB surface
        let passthrough = ShadingUniform::new(2.2, uniform.displacement);
        Self {
            uniform,
            corrected: mk_bind_group(device, layout, uniform, "shading_bind_group"),
            uncorrected: mk_bind_group(device, layout, passthrough, "shading_bind_group (no gamma)"),
        }
    }

    pub fn bind_group(&self, gamma_correction: bool) -> &wgpu::BindGroup {
        if gamma_correction {
            &self.corrected
        } else {
            &self.uncorrected
        }
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform: ShadingUniform,
    label: &str,
) -> wgpu::BindGroup {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    crate::pipelines::uniform_layout(device, "shading_bind_group_layout")
}
