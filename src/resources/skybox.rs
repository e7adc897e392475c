use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    config::{AssetConfig, RenderConfig},
    data_structures::texture::Texture,
    resources::texture::load_binary,
};

/// Face image paths in +X, -X, +Y, -Y, +Z, -Z order.
pub fn face_paths(directory: &Path, faces: &[String; 6], extension: &str) -> [PathBuf; 6] {
    faces
        .each_ref()
        .map(|face| directory.join(format!("{face}.{extension}")))
}

pub async fn load_faces(paths: &[PathBuf; 6]) -> anyhow::Result<[image::RgbaImage; 6]> {
    let mut faces = Vec::with_capacity(6);
    for path in paths {
        let bytes = load_binary(path).await?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("could not decode {}", path.display()))?;
        faces.push(img.to_rgba8());
    }
    faces
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected six skybox faces"))
}

/// Six 1x1 faces of one colour.
pub fn solid_faces(colour: [u8; 4]) -> [image::RgbaImage; 6] {
    std::array::from_fn(|_| image::RgbaImage::from_pixel(1, 1, image::Rgba(colour)))
}

/// Load the skybox cube map. Any failure is logged and replaced by a solid colour.
pub async fn load_skybox(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    assets: &AssetConfig,
    render: &RenderConfig,
) -> anyhow::Result<Texture> {
    let directory = assets.root.join(&assets.skybox);
    let paths = face_paths(&directory, &assets.skybox_faces, &assets.skybox_extension);
    let loaded = match load_faces(&paths).await {
        Ok(faces) => Texture::create_cube_map(device, queue, &faces, "skybox"),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(texture) => {
            log::debug!("Loaded skybox from {}", directory.display());
            Ok(texture)
        }
        Err(e) => {
            log::warn!("Skybox could not be loaded, using a solid colour: {e:#}");
            Texture::create_cube_map(
                device,
                queue,
                &solid_faces(render.skybox_fallback_colour),
                "skybox fallback",
            )
        }
    }
}
