//! On-screen overlay: the FPS counter and, with the `ui` feature, its text rendering.

pub mod fps;
#[cfg(feature = "ui")]
pub mod text;

use instant::Duration;

use crate::{config::AppConfig, context::Context, hud::fps::FpsCounter};

/// Left edge of a text block of `text_width` pixels placed `margin` pixels from the
/// right edge of a `screen_width` wide target. Never negative.
pub fn anchor_top_right(screen_width: f32, text_width: f32, margin: f32) -> f32 {
    (screen_width - text_width - margin).max(0.0)
}

#[derive(Debug)]
pub struct Hud {
    pub fps: FpsCounter,
    #[cfg(feature = "ui")]
    text: text::TextOverlay,
}

impl Hud {
    #[cfg_attr(not(feature = "ui"), allow(unused_variables))]
    pub fn new(ctx: &Context, config: &AppConfig) -> Self {
        Self {
            fps: FpsCounter::new(config.display.fps_buffer_size),
            #[cfg(feature = "ui")]
            text: text::TextOverlay::new(ctx, &config.hud),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        self.fps.update(dt);
    }

    #[cfg_attr(not(feature = "ui"), allow(unused_variables))]
    pub fn draw(&mut self, ctx: &Context, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        #[cfg(feature = "ui")]
        {
            self.text.set_text(&self.fps.label());
            self.text.draw(ctx, encoder, view);
        }
    }
}
