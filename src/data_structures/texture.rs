//! GPU textures and texture creation utilities.
//!
//! [`Texture`] bundles a wgpu texture with its view and sampler. Besides textures
//! decoded from image files there are constructors for depth buffers, the
//! off-screen colour target, solid colour fallbacks and the skybox cube map.

use anyhow::*;
use image::{ImageFormat, load_from_memory_with_format};

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

/// The blue/purple-ish colour that represents "no deformation" in a normal map.
pub const NEUTRAL_NORMAL: [u8; 4] = [127, 127, 255, 255];

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Depth buffer of `size` pixels, each side clamped to at least 1.
    ///
    /// Only ever used as a depth attachment, so it carries no sampler.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size, 1),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// Colour texture that can be rendered into and sampled afterwards.
    ///
    /// This is the colour attachment of the off-screen framebuffer. The format must
    /// match the pipelines that draw into it.
    pub fn create_render_target(
        device: &wgpu::Device,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size, 1),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler: Some(clamped_sampler(device)),
        }
    }

    /// A `width` x `height` texture of a single RGBA colour.
    ///
    /// Used as the default normal map ([`NEUTRAL_NORMAL`]) and as a white diffuse map
    /// for materials without textures, so shaders never need a texture-less variant.
    pub fn create_solid_colour(
        colour: [u8; 4],
        width: u32,
        height: u32,
        srgb: bool,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Texture {
        let data: Vec<u8> = colour
            .iter()
            .cycle()
            .take(width as usize * height as usize * 4)
            .copied()
            .collect();
        let texture = upload_rgba(
            device,
            queue,
            "solid colour texture",
            [width, height],
            colour_format(srgb),
            &[data.as_slice()],
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Texture {
            texture,
            view,
            sampler: Some(create_default_sampler(device)),
        }
    }

    pub fn create_default_normal_map(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
        Self::create_solid_colour(NEUTRAL_NORMAL, 1, 1, false, device, queue)
    }

    pub fn create_white(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
        Self::create_solid_colour([255; 4], 1, 1, true, device, queue)
    }

    /// Decode image file contents into a texture.
    ///
    /// `format` is an optional extension hint ("png", "jpeg", ...), the format is
    /// guessed from the data without one. Normal maps are stored linear, everything
    /// else as sRGB.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        format: Option<&str>,
        is_normal_map: bool,
    ) -> Result<Self> {
        let img = match format.and_then(ImageFormat::from_extension) {
            None => image::load_from_memory(bytes)?,
            Some(fmt) => load_from_memory_with_format(bytes, fmt)?,
        };
        Self::from_image(device, queue, &img, Some(label), is_normal_map)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
        is_normal_map: bool,
    ) -> Result<Self> {
        let rgba = img.to_rgba8();
        ensure!(rgba.width() > 0 && rgba.height() > 0, "image {label:?} is empty");
        let texture = upload_rgba(
            device,
            queue,
            label.unwrap_or("image texture"),
            [rgba.width(), rgba.height()],
            colour_format(!is_normal_map),
            &[rgba.as_raw().as_slice()],
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            sampler: Some(create_default_sampler(device)),
        })
    }

    /// Build a cube map from six equally sized RGBA faces in +X, -X, +Y, -Y, +Z, -Z
    /// order.
    pub fn create_cube_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[image::RgbaImage; 6],
        label: &str,
    ) -> Result<Self> {
        let (width, height) = faces[0].dimensions();
        ensure!(width > 0 && height > 0, "cube map {label} has empty faces");
        if let Some((idx, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.dimensions() != (width, height))
        {
            bail!(
                "cube map {label}: face {idx} is {:?}, expected {:?}",
                face.dimensions(),
                (width, height)
            );
        }

        let layers = faces.each_ref().map(|face| face.as_raw().as_slice());
        let texture = upload_rgba(device, queue, label, [width, height], colour_format(true), &layers);
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        Ok(Self {
            texture,
            view,
            sampler: Some(clamped_sampler(device)),
        })
    }

    /// The sampler of this texture, or a fresh default one for textures created without.
    pub fn sampler_or_default(&self, device: &wgpu::Device) -> wgpu::Sampler {
        self.sampler
            .clone()
            .unwrap_or_else(|| create_default_sampler(device))
    }
}

/// Repeating, linearly filtered sampler for material textures.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

/// Edge-clamped sampler for render targets and the cube map.
fn clamped_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 100.0,
        ..Default::default()
    })
}

fn colour_format(srgb: bool) -> wgpu::TextureFormat {
    if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

fn extent(size: [u32; 2], layers: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size[0].max(1),
        height: size[1].max(1),
        depth_or_array_layers: layers,
    }
}

/// Create a sampled 2D texture with one array layer per entry of `layers` and
/// upload the tightly packed RGBA8 pixels of each.
fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    size: [u32; 2],
    format: wgpu::TextureFormat,
    layers: &[&[u8]],
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(size, layers.len() as u32),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (layer, data) in layers.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size[0]),
                rows_per_image: Some(size[1]),
            },
            extent(size, 1),
        );
    }
    texture
}
