//! Meshes, materials and models as they live on the GPU.
//!
//! A [`Model`] owns its [`Mesh`]es and [`Material`]s until it is dropped. Every
//! shader view draws the same vertex/index buffers; only the per-view transform
//! record and the bound pipeline differ between draws.

use std::ops::Range;
use std::path::PathBuf;

use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{InstanceRaw, Transform},
        texture::Texture,
    },
    render::ShaderView,
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Lighting coefficients of a material, laid out for a uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialCoefficients {
    pub ambient: [f32; 3],
    pub shininess: f32,
    pub diffuse: [f32; 3],
    pub _padding: f32,
    pub specular: [f32; 3],
    pub _padding2: f32,
}

impl MaterialCoefficients {
    /// Fill in whatever the importer provided, defaults for the rest.
    pub fn from_parts(
        ambient: Option<[f32; 3]>,
        diffuse: Option<[f32; 3]>,
        specular: Option<[f32; 3]>,
        shininess: Option<f32>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            ambient: ambient.unwrap_or(defaults.ambient),
            diffuse: diffuse.unwrap_or(defaults.diffuse),
            specular: specular.unwrap_or(defaults.specular),
            // A zero exponent would turn every highlight into a flat wash
            shininess: shininess.filter(|s| *s > 0.0).unwrap_or(defaults.shininess),
            ..defaults
        }
    }
}

impl Default for MaterialCoefficients {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.1, 0.1],
            shininess: 32.0,
            diffuse: [1.0, 1.0, 1.0],
            _padding: 0.0,
            specular: [0.5, 0.5, 0.5],
            _padding2: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub diffuse_texture: Texture,
    pub normal_texture: Texture,
    pub coefficients: MaterialCoefficients,
    pub coefficients_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        diffuse_texture: Texture,
        normal_texture: Texture,
        coefficients: MaterialCoefficients,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let coefficients_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} coefficients")),
            contents: bytemuck::cast_slice(&[coefficients]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = mk_material_bind_group(
            device,
            layout,
            name,
            &diffuse_texture,
            &normal_texture,
            &coefficients_buffer,
        );
        Self {
            name: name.to_string(),
            diffuse_texture,
            normal_texture,
            coefficients,
            coefficients_buffer,
            bind_group,
        }
    }

    /// A bind group identical to this material's except for the diffuse input.
    ///
    /// This is how the off-screen framebuffer is fed back into the scene: the
    /// material itself is never modified.
    pub fn bind_group_with_diffuse(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        diffuse: &Texture,
    ) -> wgpu::BindGroup {
        mk_material_bind_group(
            device,
            layout,
            &format!("{} (diffuse override)", self.name),
            diffuse,
            &self.normal_texture,
            &self.coefficients_buffer,
        )
    }
}

fn mk_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    diffuse: &Texture,
    normal: &Texture,
    coefficients: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let diffuse_sampler = diffuse.sampler_or_default(device);
    let normal_sampler = normal.sampler_or_default(device);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&diffuse_sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&normal.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&normal_sampler),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: coefficients.as_entire_binding(),
            },
        ],
        label: Some(label),
    })
}

/// Vertex and index buffers of one piece of geometry.
#[derive(Debug)]
pub struct GeometryBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl GeometryBuffers {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[ModelVertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub geometry: GeometryBuffers,
    /// The subdivided version of `geometry` drawn by the tessellation view
    pub tessellated: GeometryBuffers,
    pub material: usize,
}

impl Mesh {
    pub fn geometry_for(&self, view: ShaderView) -> &GeometryBuffers {
        match view {
            ShaderView::Tessellation => &self.tessellated,
            _ => &self.geometry,
        }
    }
}

#[derive(Debug)]
pub struct Model {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    /// Directory the model file was loaded from, texture paths resolve against it
    pub directory: PathBuf,
    pub gamma_correction: bool,
    transform: Transform,
    /// One [`InstanceRaw`] per [`ShaderView`], indexed by [`ShaderView::slot`]
    view_transforms: wgpu::Buffer,
}

impl Model {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        meshes: Vec<Mesh>,
        materials: Vec<Material>,
        directory: PathBuf,
        transform: Transform,
        gamma_correction: bool,
    ) -> Self {
        let view_transforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} view transforms")),
            contents: bytemuck::cast_slice(&view_instances(&transform, 0.0)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            name: name.to_string(),
            meshes,
            materials,
            directory,
            gamma_correction,
            transform,
            view_transforms,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.transform.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.transform.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.transform.scale = scale;
    }

    pub fn increase_position(&mut self, delta: Vector3<f32>) {
        self.transform.position += delta;
    }

    pub fn increase_rotation(&mut self, delta: Vector3<f32>) {
        self.transform.rotation += delta;
    }

    pub fn increase_scale(&mut self, delta: f32) {
        self.transform.scale += delta;
    }

    /// Upload the transform of every shader view.
    ///
    /// All views are written at once because queue writes land before the next
    /// submission: rewriting a single record between draws of the same frame would
    /// leave every draw with the last value.
    pub fn write_view_transforms(&self, queue: &wgpu::Queue, pass_spacing: f32) {
        queue.write_buffer(
            &self.view_transforms,
            0,
            bytemuck::cast_slice(&view_instances(&self.transform, pass_spacing)),
        );
    }

    pub fn view_transform_slice(&self, view: ShaderView) -> wgpu::BufferSlice<'_> {
        let start = view.slot() as wgpu::BufferAddress * InstanceRaw::SIZE;
        self.view_transforms.slice(start..start + InstanceRaw::SIZE)
    }
}

/// The transform record of every shader view, in slot order.
pub fn view_instances(transform: &Transform, pass_spacing: f32) -> [InstanceRaw; ShaderView::COUNT] {
    ShaderView::ALL.map(|view| transform.translated(view.offset(pass_spacing)).to_raw())
}

/// Draw helpers for render passes, mirroring how the scene issues its draw calls.
pub trait DrawModel<'a> {
    fn draw_mesh(
        &mut self,
        geometry: &'a GeometryBuffers,
        material: Option<&'a wgpu::BindGroup>,
        instances: Range<u32>,
    );

    /// Draw every mesh of `model` as seen by `view`.
    ///
    /// `material_override` replaces the material bind group of the mesh at the given
    /// index for this draw only.
    fn draw_model_view(
        &mut self,
        model: &'a Model,
        view: ShaderView,
        material_override: Option<(usize, &'a wgpu::BindGroup)>,
    );
}

impl<'a> DrawModel<'a> for wgpu::RenderPass<'a> {
    fn draw_mesh(
        &mut self,
        geometry: &'a GeometryBuffers,
        material: Option<&'a wgpu::BindGroup>,
        instances: Range<u32>,
    ) {
        self.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        self.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        if let Some(material) = material {
            self.set_bind_group(0, material, &[]);
        }
        self.draw_indexed(0..geometry.num_elements, 0, instances);
    }

    fn draw_model_view(
        &mut self,
        model: &'a Model,
        view: ShaderView,
        material_override: Option<(usize, &'a wgpu::BindGroup)>,
    ) {
        self.set_vertex_buffer(1, model.view_transform_slice(view));
        for (idx, mesh) in model.meshes.iter().enumerate() {
            let material = if !view.binds_material() {
                None
            } else {
                match material_override {
                    Some((mesh_idx, group)) if mesh_idx == idx => Some(group),
                    _ => match model.materials.get(mesh.material) {
                        Some(material) => Some(&material.bind_group),
                        None => {
                            log::warn!(
                                "Mesh {} of {} references missing material {}",
                                idx,
                                model.name,
                                mesh.material
                            );
                            continue;
                        }
                    },
                }
            };
            self.draw_mesh(mesh.geometry_for(view), material, 0..1);
        }
    }
}
