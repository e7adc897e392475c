//! Loading models, textures, the scene file and the skybox from the asset root.
//!
//! Loading is best-effort: a texture that cannot be read is logged and replaced by a
//! fallback, a model that cannot be read is logged and skipped by the scene.

use std::{
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};

use crate::{
    data_structures::{
        instance::Transform,
        model::{self, Material, MaterialCoefficients, ModelVertex},
        texture::Texture,
    },
    resources::texture::{TextureCache, load_binary, load_string},
};

pub mod mesh;
pub mod scene;
pub mod skybox;
pub mod texture;

/// The importers a model file can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
    Gltf,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("obj") => Ok(ModelFormat::Obj),
            Some("gltf") | Some("glb") => Ok(ModelFormat::Gltf),
            _ => bail!("unsupported model format: {}", path.display()),
        }
    }
}

/// How a model is placed and prepared when it is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelLoadOptions {
    pub transform: Transform,
    pub gamma_correction: bool,
    pub tessellation_level: u32,
}

impl Default for ModelLoadOptions {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            gamma_correction: true,
            tessellation_level: 0,
        }
    }
}

/// Load a model file, picking the importer from its extension.
pub async fn load_model(
    path: &Path,
    options: &ModelLoadOptions,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<model::Model> {
    match ModelFormat::from_path(path)? {
        ModelFormat::Obj => load_model_obj(path, options, device, queue, layout).await,
        ModelFormat::Gltf => load_model_gltf(path, options, device, queue, layout).await,
    }
}

/// Map each mesh's requested material to a valid index.
///
/// Meshes without a material, or with an index past `material_count`, get the index
/// `material_count`, where the caller appends a default material. The flag tells
/// whether that default is needed.
pub fn resolve_material_indices(requested: &[Option<usize>], material_count: usize) -> (Vec<usize>, bool) {
    let mut needs_default = false;
    let resolved = requested
        .iter()
        .map(|idx| match idx {
            Some(idx) if *idx < material_count => *idx,
            _ => {
                needs_default = true;
                material_count
            }
        })
        .collect();
    (resolved, needs_default)
}

fn default_material(device: &wgpu::Device, queue: &wgpu::Queue, layout: &wgpu::BindGroupLayout) -> Material {
    Material::new(
        device,
        "default",
        Texture::create_white(device, queue),
        Texture::create_default_normal_map(device, queue),
        MaterialCoefficients::default(),
        layout,
    )
}

fn model_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn model_directory(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub async fn load_model_obj(
    path: &Path,
    options: &ModelLoadOptions,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<model::Model> {
    let name = model_name(path);
    let directory = model_directory(path);
    let obj_text = load_string(path).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let mtl_dir = directory.clone();
    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        move |p| {
            let mtl_path = mtl_dir.join(p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("{e:#}");
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await
    .with_context(|| format!("could not parse {}", path.display()))?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("Materials of {} could not be loaded: {e}", path.display());
        Vec::new()
    });

    let mut textures = TextureCache::new();
    let mut materials = Vec::with_capacity(obj_materials.len() + 1);
    for m in &obj_materials {
        let diffuse_texture = match &m.diffuse_texture {
            Some(file) => textures.try_load(&directory.join(file), false, device, queue).await,
            None => {
                log::warn!("Material {} of {name} references no diffuse texture.", m.name);
                None
            }
        };
        let normal_texture = match &m.normal_texture {
            Some(file) => textures.try_load(&directory.join(file), true, device, queue).await,
            None => None,
        };
        materials.push(Material::new(
            device,
            &m.name,
            diffuse_texture.unwrap_or_else(|| Texture::create_white(device, queue)),
            normal_texture.unwrap_or_else(|| Texture::create_default_normal_map(device, queue)),
            MaterialCoefficients::from_parts(m.ambient, m.diffuse, m.specular, m.shininess),
            layout,
        ));
    }

    let requested: Vec<Option<usize>> = models.iter().map(|m| m.mesh.material_id).collect();
    let (material_indices, needs_default) = resolve_material_indices(&requested, materials.len());
    if needs_default {
        materials.push(default_material(device, queue, layout));
    }

    let meshes = models
        .iter()
        .zip(material_indices)
        .map(|(m, material)| {
            let mut vertices = mesh::vertices_from_obj(&m.mesh);
            mesh::compute_tangents(&mut vertices, &m.mesh.indices);
            mesh::build_mesh(
                device,
                &format!("{name}/{}", m.name),
                &vertices,
                &m.mesh.indices,
                material,
                options.tessellation_level,
            )
        })
        .collect::<Vec<_>>();

    log::info!(
        "Loaded {name}: {} meshes, {} materials, {} textures",
        meshes.len(),
        materials.len(),
        textures.len()
    );
    Ok(model::Model::new(
        device,
        &name,
        meshes,
        materials,
        directory,
        options.transform,
        options.gamma_correction,
    ))
}

pub async fn load_model_gltf(
    path: &Path,
    options: &ModelLoadOptions,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<model::Model> {
    let name = model_name(path);
    let directory = model_directory(path);
    let gltf_bytes = load_binary(path).await?;
    let gltf = gltf::Gltf::from_slice(&gltf_bytes)
        .with_context(|| format!("could not parse {}", path.display()))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffer_data.push(blob.into()),
                None => bail!("{} references a missing binary chunk", path.display()),
            },
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    bail!("{}: embedded data URIs are not supported", path.display());
                }
                buffer_data.push(load_binary(directory.join(uri)).await?);
            }
        }
    }

    let mut textures = TextureCache::new();
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => {
                gltf_texture(info.texture(), false, &directory, &buffer_data, &mut textures, device, queue).await
            }
            None => None,
        };
        let normal_texture = match material.normal_texture() {
            Some(info) => {
                gltf_texture(info.texture(), true, &directory, &buffer_data, &mut textures, device, queue).await
            }
            None => None,
        };
        let [r, g, b, _] = pbr.base_color_factor();
        let material_name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{name}#{}", material.index().unwrap_or(0)));
        materials.push(Material::new(
            device,
            &material_name,
            diffuse_texture.unwrap_or_else(|| Texture::create_white(device, queue)),
            normal_texture.unwrap_or_else(|| Texture::create_default_normal_map(device, queue)),
            MaterialCoefficients::from_parts(None, Some([r, g, b]), None, None),
            layout,
        ));
    }

    let mut primitives = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            collect_primitives(&node, &buffer_data, &mut primitives);
        }
    }

    let requested: Vec<Option<usize>> = primitives.iter().map(|p| p.material).collect();
    let (material_indices, needs_default) = resolve_material_indices(&requested, materials.len());
    if needs_default {
        materials.push(default_material(device, queue, layout));
    }

    let meshes = primitives
        .iter()
        .zip(material_indices)
        .map(|(p, material)| {
            mesh::build_mesh(device, &p.name, &p.vertices, &p.indices, material, options.tessellation_level)
        })
        .collect::<Vec<_>>();

    log::info!(
        "Loaded {name}: {} meshes, {} materials, {} textures",
        meshes.len(),
        materials.len(),
        textures.len()
    );
    Ok(model::Model::new(
        device,
        &name,
        meshes,
        materials,
        directory,
        options.transform,
        options.gamma_correction,
    ))
}

/// One triangle primitive read out of a glTF node.
struct GltfPrimitive {
    name: String,
    vertices: Vec<ModelVertex>,
    indices: Vec<u32>,
    material: Option<usize>,
}

/// Walk a node and its children. Node transforms are not applied: the scene file
/// places the model as a whole.
fn collect_primitives(node: &gltf::Node, buffer_data: &[Vec<u8>], out: &mut Vec<GltfPrimitive>) {
    if let Some(gltf_mesh) = node.mesh() {
        let mesh_name = gltf_mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh#{}", gltf_mesh.index()));
        for primitive in gltf_mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of {mesh_name}: mode {:?} is not a triangle list",
                    primitive.index(),
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::warn!("Skipping primitive {} of {mesh_name}: no positions", primitive.index());
                continue;
            };
            let mut vertices: Vec<ModelVertex> = positions
                .map(|position| ModelVertex {
                    position,
                    tex_coords: [0.0; 2],
                    normal: [0.0; 3],
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                })
                .collect();
            if let Some(normals) = reader.read_normals() {
                for (v, normal) in vertices.iter_mut().zip(normals) {
                    v.normal = normal;
                }
            }
            if let Some(tex_coords) = reader.read_tex_coords(0) {
                for (v, uv) in vertices.iter_mut().zip(tex_coords.into_f32()) {
                    v.tex_coords = uv;
                }
            }
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertices.len() as u32).collect(),
            };
            mesh::compute_tangents(&mut vertices, &indices);
            out.push(GltfPrimitive {
                name: format!("{mesh_name}/{}", primitive.index()),
                vertices,
                indices,
                material: primitive.material().index(),
            });
        }
    }
    for child in node.children() {
        collect_primitives(&child, buffer_data, out);
    }
}

async fn gltf_texture(
    texture: gltf::Texture<'_>,
    is_normal_map: bool,
    directory: &Path,
    buffer_data: &[Vec<u8>],
    cache: &mut TextureCache,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Option<Texture> {
    match texture.source().source() {
        gltf::image::Source::View { view, mime_type } => {
            let data = buffer_data.get(view.buffer().index())?;
            let bytes = data.get(view.offset()..view.offset() + view.length())?;
            Texture::from_bytes(
                device,
                queue,
                bytes,
                &format!("embedded image #{}", texture.source().index()),
                mime_type.split('/').next_back(),
                is_normal_map,
            )
            .map_err(|e| log::error!("Embedded texture failed to decode: {e:#}"))
            .ok()
        }
        gltf::image::Source::Uri { uri, .. } => {
            cache.try_load(&directory.join(uri), is_normal_map, device, queue).await
        }
    }
}
