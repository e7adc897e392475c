//! The loaded scene and the execution of a frame.
//!
//! Every model is drawn once per [`ShaderView`], shifted along -X by the view's
//! offset, in the order fixed by [`FRAME_PASSES`]. The first pass renders into an
//! off-screen framebuffer whose colour target is then bound as the diffuse input of the
//! first mesh of the first model in the on-screen basic view.

use std::iter;

use crate::{
    config::AppConfig,
    context::Context,
    data_structures::{
        framebuffer::FrameBufferObject,
        model::{DrawModel, Model},
    },
    hud::Hud,
    pipelines::{Layouts, skybox::Skybox},
    render::{FRAME_PASSES, Pass, ShaderView},
    resources::{self, ModelLoadOptions, scene::SceneFile, skybox::load_skybox},
};

/// The model and mesh whose diffuse input receives the framebuffer contents.
pub const FEEDBACK_TARGET: (usize, usize) = (0, 0);

#[derive(Debug)]
pub struct Scene {
    pub models: Vec<Model>,
    pub skybox: Skybox,
    framebuffer: FrameBufferObject,
    /// Material bind group of the feedback target with the framebuffer as diffuse
    feedback: Option<wgpu::BindGroup>,
    pass_spacing: f32,
}

impl Scene {
    /// Load every model named by the scene file, the skybox and the framebuffer.
    ///
    /// Models that fail to load are logged and left out. A missing or broken scene file
    /// yields an empty scene.
    pub async fn load(ctx: &Context, config: &AppConfig) -> anyhow::Result<Self> {
        let scene_path = config.scene_path();
        let scene_file = match SceneFile::load(&scene_path).await {
            Ok(scene_file) => scene_file,
            Err(e) => {
                log::error!("Scene file could not be loaded, continuing without models: {e:#}");
                SceneFile::default()
            }
        };

        let loads = scene_file.models.iter().map(|entry| {
            let path = config.assets.root.join(&entry.path);
            let options = ModelLoadOptions {
                transform: entry.transform(),
                gamma_correction: entry.gamma_correction,
                tessellation_level: config.render.tessellation_level,
            };
            async move {
                let result =
                    resources::load_model(&path, &options, &ctx.device, &ctx.queue, &ctx.layouts.material)
                        .await;
                (path, result)
            }
        });
        let models: Vec<Model> = futures::future::join_all(loads)
            .await
            .into_iter()
            .filter_map(|(path, result)| match result {
                Ok(model) => Some(model),
                Err(e) => {
                    log::error!("Model {} skipped: {e:#}", path.display());
                    None
                }
            })
            .collect();
        log::info!(
            "Scene loaded {} of {} models",
            models.len(),
            scene_file.models.len()
        );

        let skybox_texture = load_skybox(&ctx.device, &ctx.queue, &config.assets, &config.render).await?;
        let skybox = Skybox::new(&ctx.device, skybox_texture, &ctx.layouts.environment);

        Ok(Self::new(
            &ctx.device,
            &ctx.layouts,
            models,
            skybox,
            [ctx.config.width, ctx.config.height],
            ctx.config.format,
            config.render.pass_spacing,
        ))
    }

    /// Assemble a scene from loaded models, with a framebuffer of `size` pixels in
    /// the given colour `format`.
    pub fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        models: Vec<Model>,
        skybox: Skybox,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        pass_spacing: f32,
    ) -> Self {
        let framebuffer = FrameBufferObject::new(device, size, format);
        let feedback = feedback_bind_group(device, &layouts.material, &models, &framebuffer);
        Self {
            models,
            skybox,
            framebuffer,
            feedback,
            pass_spacing,
        }
    }

    /// Recreate the framebuffer at the surface size and rebind it.
    pub fn resize(&mut self, ctx: &Context) {
        self.resize_to(
            &ctx.device,
            &ctx.layouts,
            [ctx.config.width, ctx.config.height],
            ctx.config.format,
        );
    }

    pub fn resize_to(
        &mut self,
        device: &wgpu::Device,
        layouts: &Layouts,
        size: [u32; 2],
        format: wgpu::TextureFormat,
    ) {
        self.framebuffer = FrameBufferObject::new(device, size, format);
        self.feedback = feedback_bind_group(device, &layouts.material, &self.models, &self.framebuffer);
    }

    pub fn framebuffer(&self) -> &FrameBufferObject {
        &self.framebuffer
    }

    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }

    /// Execute [`FRAME_PASSES`] and present.
    pub fn render(&self, ctx: &Context, hud: &mut Hud) -> Result<(), wgpu::SurfaceError> {
        for model in &self.models {
            model.write_view_transforms(&ctx.queue, self.pass_spacing);
        }

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        for pass in FRAME_PASSES {
            match pass {
                Pass::Offscreen => {
                    let mut render_pass = self.framebuffer.begin_pass(&mut encoder, ctx.clear_colour);
                    self.draw_models(&mut render_pass, ctx, ShaderView::Basic, false);
                }
                Pass::Feedback => {
                    let mut render_pass =
                        begin_screen_pass(&mut encoder, &view, &ctx.depth_texture.view, Some(ctx.clear_colour));
                    self.draw_models(&mut render_pass, ctx, ShaderView::Basic, true);
                }
                Pass::Screen(shader_view) => {
                    let mut render_pass =
                        begin_screen_pass(&mut encoder, &view, &ctx.depth_texture.view, None);
                    self.draw_models(&mut render_pass, ctx, shader_view, false);
                }
                Pass::Skybox => {
                    let mut render_pass =
                        begin_screen_pass(&mut encoder, &view, &ctx.depth_texture.view, None);
                    self.skybox
                        .draw(&mut render_pass, &ctx.pipelines.skybox, &ctx.camera.bind_group);
                }
                Pass::Hud => hud.draw(ctx, &mut encoder, &view),
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn draw_models<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        ctx: &'a Context,
        view: ShaderView,
        with_feedback: bool,
    ) {
        render_pass.set_pipeline(ctx.pipelines.get(view));
        render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
        match view {
            ShaderView::Static | ShaderView::Tessellation => {
                render_pass.set_bind_group(2, &ctx.light.bind_group, &[]);
            }
            ShaderView::Reflection => {
                render_pass.set_bind_group(0, &self.skybox.bind_group, &[]);
            }
            ShaderView::Basic | ShaderView::Normal => {}
        }

        let (feedback_model, feedback_mesh) = FEEDBACK_TARGET;
        for (idx, model) in self.models.iter().enumerate() {
            if matches!(view, ShaderView::Static | ShaderView::Tessellation) {
                render_pass.set_bind_group(3, ctx.shading.bind_group(model.gamma_correction), &[]);
            }
            let material_override = match &self.feedback {
                Some(group) if with_feedback && idx == feedback_model => Some((feedback_mesh, group)),
                _ => None,
            };
            render_pass.draw_model_view(model, view, material_override);
        }
    }
}

/// The feedback target's material rebound with the framebuffer colour target.
///
/// `None` when the scene has no model, or the first model has no mesh.
pub fn feedback_bind_group(
    device: &wgpu::Device,
    material_layout: &wgpu::BindGroupLayout,
    models: &[Model],
    framebuffer: &FrameBufferObject,
) -> Option<wgpu::BindGroup> {
    let (model_idx, mesh_idx) = FEEDBACK_TARGET;
    let model = models.get(model_idx)?;
    let Some(mesh) = model.meshes.get(mesh_idx) else {
        log::warn!("{} has no meshes, framebuffer feedback is disabled", model.name);
        return None;
    };
    let Some(material) = model.materials.get(mesh.material) else {
        log::warn!("{} has no material for its first mesh, framebuffer feedback is disabled", model.name);
        return None;
    };
    Some(material.bind_group_with_diffuse(device, material_layout, framebuffer.colour_texture()))
}

/// A pass onto the surface. `clear` clears colour and depth, `None` keeps both.
fn begin_screen_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear: Option<wgpu::Color>,
) -> wgpu::RenderPass<'e> {
    let (colour_load, depth_load) = match clear {
        Some(colour) => (wgpu::LoadOp::Clear(colour), wgpu::LoadOp::Clear(1.0)),
        None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
    };
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: colour_load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: depth_load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
        multiview_mask: None,
    })
}
