use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use crate::{config::HudConfig, context::Context, hud::anchor_top_right};

/// One line of text in the top right corner of the window.
pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffer: Buffer,
    text: String,
    colour: Color,
    margin: f32,
}

impl std::fmt::Debug for TextOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextOverlay").field("text", &self.text).finish()
    }
}

impl TextOverlay {
    pub fn new(ctx: &Context, config: &HudConfig) -> Self {
        let device = &ctx.device;
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, &ctx.queue, &cache, ctx.config.format);
        let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        let mut buffer = Buffer::new(
            &mut font_system,
            Metrics::new(config.font_size, config.line_height),
        );
        buffer.set_size(
            &mut font_system,
            Some(ctx.config.width as f32),
            Some(ctx.config.height as f32),
        );
        let [r, g, b] = config.colour;
        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            buffer,
            text: String::new(),
            colour: Color::rgb(r, g, b),
            margin: config.margin,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = text.to_string();
        self.buffer.set_text(
            &mut self.font_system,
            text,
            &Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
            None,
        );
        self.buffer.shape_until_scroll(&mut self.font_system, false);
    }

    fn text_width(&self) -> f32 {
        self.buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max)
    }

    /// Draw in its own pass: the text pipeline has no depth attachment.
    pub fn draw(&mut self, ctx: &Context, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let (width, height) = (ctx.config.width, ctx.config.height);
        self.buffer
            .set_size(&mut self.font_system, Some(width as f32), Some(height as f32));
        self.viewport.update(&ctx.queue, Resolution { width, height });

        let left = anchor_top_right(width as f32, self.text_width(), self.margin);
        let prepared = self.renderer.prepare(
            &ctx.device,
            &ctx.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            [TextArea {
                buffer: &self.buffer,
                left,
                top: self.margin,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: width as i32,
                    bottom: height as i32,
                },
                default_color: self.colour,
                custom_glyphs: &[],
            }],
            &mut self.swash_cache,
        );
        if let Err(e) = prepared {
            log::error!("HUD text could not be prepared: {e}");
            return;
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            if let Err(e) = self.renderer.render(&self.atlas, &self.viewport, &mut pass) {
                log::error!("HUD text could not be drawn: {e}");
            }
        }
        self.atlas.trim();
    }
}
