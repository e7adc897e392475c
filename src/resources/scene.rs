//! The scene file: which models to load and where to put them.
//!
//! ```toml
//! [[model]]
//! path = "models/cube/cube.obj"
//! position = [0.0, 0.0, 0.0]
//! rotation = [0.0, 45.0, 0.0]  # degrees
//! scale = 1.0
//! gamma_correction = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cgmath::Vector3;
use serde::Deserialize;

use crate::{data_structures::instance::Transform, resources::texture::load_string};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneFile {
    #[serde(rename = "model", default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelEntry {
    /// Model file, relative to the asset root
    pub path: PathBuf,
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_gamma_correction")]
    pub gamma_correction: bool,
}

fn default_scale() -> f32 {
    1.0
}

fn default_gamma_correction() -> bool {
    true
}

impl ModelEntry {
    pub fn transform(&self) -> Transform {
        Transform::new(
            Vector3::from(self.position),
            Vector3::from(self.rotation),
            self.scale,
        )
    }
}

impl SceneFile {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let text = load_string(path).await?;
        Self::parse(&text).with_context(|| format!("invalid scene file {}", path.display()))
    }
}
