use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::data_structures::texture;

/// Layout of a material bind group.
///
/// Bindings: 0/1 diffuse texture and sampler, 2/3 normal map and sampler, 4 the
/// material coefficients. Textures are visible to the vertex stage as well because the
/// tessellation view displaces vertices by the diffuse map.
pub fn diffuse_normal_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: stages,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: stages,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: stages,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: stages,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: stages,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("Model texture_bind_group_layout"),
    })
}

pub async fn load_string(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))
}

pub async fn load_binary(path: impl AsRef<Path>) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .with_context(|| format!("could not read {}", path.display()))
}

pub async fn load_texture(
    path: &Path,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(path).await?;
    let label = path.to_string_lossy();
    let format = path.extension().and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, &label, format, is_normal_map)
        .with_context(|| format!("could not decode {}", path.display()))
}

/// Textures already loaded for one model, keyed by path and colour space.
///
/// Materials sharing an image reuse the same GPU texture.
#[derive(Debug, Default)]
pub struct TextureCache {
    loaded: HashMap<(PathBuf, bool), texture::Texture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_load(
        &mut self,
        path: &Path,
        is_normal_map: bool,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> anyhow::Result<texture::Texture> {
        let key = (path.to_path_buf(), is_normal_map);
        if let Some(texture) = self.loaded.get(&key) {
            return Ok(texture.clone());
        }
        let texture = load_texture(path, is_normal_map, device, queue).await?;
        log::debug!("Loaded texture {}", path.display());
        self.loaded.insert(key, texture.clone());
        Ok(texture)
    }

    /// Like [`get_or_load`](Self::get_or_load), but logs failures and returns `None`.
    pub async fn try_load(
        &mut self,
        path: &Path,
        is_normal_map: bool,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Option<texture::Texture> {
        match self.get_or_load(path, is_normal_map, device, queue).await {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::error!("Texture failed to load at path: {}: {e:#}", path.display());
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
