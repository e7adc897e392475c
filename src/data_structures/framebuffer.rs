//! Off-screen framebuffer.
//!
//! The scene is rendered into the colour target of a [`FrameBufferObject`] first;
//! that target is then sampled like any other texture in the on-screen passes.

use crate::data_structures::texture::Texture;

#[derive(Debug)]
pub struct FrameBufferObject {
    colour: Texture,
    depth: Texture,
    size: [u32; 2],
}

impl FrameBufferObject {
    /// Create colour and depth targets of `size` pixels (each side at least 1).
    ///
    /// `format` has to be the colour format the drawing pipelines were built for.
    pub fn new(device: &wgpu::Device, size: [u32; 2], format: wgpu::TextureFormat) -> Self {
        let size = [size[0].max(1), size[1].max(1)];
        log::debug!("Creating framebuffer {}x{} ({:?})", size[0], size[1], format);
        Self {
            colour: Texture::create_render_target(device, size, format, "framebuffer colour"),
            depth: Texture::create_depth_texture(device, size, "framebuffer depth"),
            size,
        }
    }

    pub fn colour_texture(&self) -> &Texture {
        &self.colour
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Begin a pass that clears and draws into this framebuffer.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        clear_colour: wgpu::Color,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Framebuffer Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.colour.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        })
    }
}
