#![cfg(feature = "integration-tests")]

use std::path::Path;

use shaderbox::{
    data_structures::{model::Model, texture::Texture},
    pipelines::{Layouts, skybox::Skybox},
    resources::{self, ModelLoadOptions, skybox::solid_faces},
};

/// Colour format of the off-screen framebuffer in the tests.
pub const TEST_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// A device without a window or surface.
pub struct HeadlessGpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub layouts: Layouts,
}

impl HeadlessGpu {
    pub async fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("headless test device"),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await?;
        let layouts = Layouts::new(&device);
        Ok(Self {
            device,
            queue,
            layouts,
        })
    }

    pub fn skybox(&self) -> Skybox {
        let texture = Texture::create_cube_map(&self.device, &self.queue, &solid_faces([40, 60, 90, 255]), "test sky")
            .expect("solid faces form a valid cube map");
        Skybox::new(&self.device, texture, &self.layouts.environment)
    }

    pub async fn load_cube(&self) -> Model {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/models/cube/cube.obj");
        resources::load_model(
            &path,
            &ModelLoadOptions::default(),
            &self.device,
            &self.queue,
            &self.layouts.material,
        )
        .await
        .expect("the bundled cube loads")
    }
}
