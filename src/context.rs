use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, CameraUniform, Projection},
    config::AppConfig,
    data_structures::texture,
    pipelines::{
        Layouts, Pipelines,
        light::{LightResources, LightUniform},
        shading::{ShadingResources, ShadingUniform},
    },
};

/// Everything bound to the window and the GPU: surface, device, pipelines and the
/// per-frame uniforms shared by all passes.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub layouts: Layouts,
    pub pipelines: Pipelines,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub shading: ShadingResources,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, app_config: &AppConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::debug!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable graphics adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                ..Default::default()
            })
            .await
            .context("could not open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders write linear colour and rely on an sRGB surface for the encoding
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let layouts = Layouts::new(&device);
        let pipelines = Pipelines::new(&device, config.format, &layouts);

        let cam_cfg = &app_config.camera;
        let camera_controller = camera::CameraController::from_config(cam_cfg);
        let mut camera = camera::Camera::new(
            cam_cfg.start_position,
            cgmath::Deg(cam_cfg.yaw),
            cgmath::Deg(cam_cfg.pitch),
        );
        camera_controller.clamp_pitch(&mut camera);
        let display = &app_config.display;
        let projection = camera::Projection::new(
            config.width,
            config.height,
            cgmath::Deg(display.fov),
            display.near_plane,
            display.far_plane,
        );
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });
        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let render = &app_config.render;
        let light = LightResources::new(
            &device,
            &layouts.light,
            LightUniform::new(render.light_position, render.light_colour),
        );
        let shading = ShadingResources::new(
            &device,
            &layouts.shading,
            ShadingUniform::new(render.gamma, render.displacement),
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            layouts,
            pipelines,
            camera,
            projection,
            light,
            shading,
            clear_colour: render.clear_colour(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigure the surface and everything sized after it. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.projection.resize(width, height);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
    }

    /// Move the camera by the controller input accumulated since the last frame and
    /// upload the result.
    pub fn update_camera(&mut self, dt: instant::Duration) {
        let cam = &mut self.camera;
        cam.controller.update(&mut cam.camera, dt);
        cam.uniform.update_view_proj(&cam.camera, &self.projection);
        self.queue
            .write_buffer(&cam.buffer, 0, bytemuck::cast_slice(&[cam.uniform]));
    }
}
