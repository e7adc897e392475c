//! Frame composition: which shader views exist and in which order a frame runs them.
//!
//! The loaded geometry is shared by every view. A [`ShaderView`] selects the
//! pipeline, the geometry variant and the per-view transform slot; [`FRAME_PASSES`]
//! fixes the order in which the scene executes the passes each frame.
//!
//! # Key types
//!
//! - [`ShaderView`] is one pipeline's rendering of the shared models
//! - [`Pass`] is one step of a frame
//! - [`FRAME_PASSES`] is the frame itself
//!

use cgmath::Vector3;

/// One pipeline's rendering of the shared models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderView {
    /// Unlit diffuse texture
    Basic,
    /// Diffuse texture lit by the scene light, gamma corrected
    Static,
    /// World-space normals as colours
    Normal,
    /// Subdivided geometry displaced along its normals
    Tessellation,
    /// Environment reflection of the skybox
    Reflection,
}

impl ShaderView {
    pub const COUNT: usize = 5;

    /// Every view, in slot order.
    pub const ALL: [ShaderView; Self::COUNT] = [
        ShaderView::Basic,
        ShaderView::Static,
        ShaderView::Normal,
        ShaderView::Tessellation,
        ShaderView::Reflection,
    ];

    /// Index of this view's record in a model's view-transform buffer.
    pub fn slot(self) -> usize {
        match self {
            ShaderView::Basic => 0,
            ShaderView::Static => 1,
            ShaderView::Normal => 2,
            ShaderView::Tessellation => 3,
            ShaderView::Reflection => 4,
        }
    }

    /// Where this view places the models relative to their own transform.
    ///
    /// Views are laid out side by side along -X, `spacing` apart.
    pub fn offset(self, spacing: f32) -> Vector3<f32> {
        Vector3::new(-(self.slot() as f32) * spacing, 0.0, 0.0)
    }

    /// Whether draws in this view bind each mesh's material at group 0.
    pub fn binds_material(self) -> bool {
        !matches!(self, ShaderView::Reflection)
    }

    pub fn label(self) -> &'static str {
        match self {
            ShaderView::Basic => "basic",
            ShaderView::Static => "static",
            ShaderView::Normal => "normal",
            ShaderView::Tessellation => "tessellation",
            ShaderView::Reflection => "reflection",
        }
    }
}

/// One step of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Basic view of every model into the off-screen framebuffer
    Offscreen,
    /// Basic view on screen, with the framebuffer's colour target as the diffuse
    /// input of the first mesh of the first model
    Feedback,
    /// Any other view on screen
    Screen(ShaderView),
    Skybox,
    /// Text overlay, drawn last without depth testing
    Hud,
}

impl Pass {
    /// The shader view used for the models, if the pass draws models.
    pub fn view(self) -> Option<ShaderView> {
        match self {
            Pass::Offscreen | Pass::Feedback => Some(ShaderView::Basic),
            Pass::Screen(view) => Some(view),
            Pass::Skybox | Pass::Hud => None,
        }
    }

    /// Whether the pass draws into the depth-tested screen target.
    pub fn is_scene_pass(self) -> bool {
        matches!(self, Pass::Feedback | Pass::Screen(_) | Pass::Skybox)
    }
}

/// The fixed order of a frame.
///
/// The screen is cleared when the first scene pass (`Feedback`) begins, after the
/// off-screen pass has finished.
pub const FRAME_PASSES: [Pass; 8] = [
    Pass::Offscreen,
    Pass::Feedback,
    Pass::Screen(ShaderView::Static),
    Pass::Screen(ShaderView::Normal),
    Pass::Screen(ShaderView::Tessellation),
    Pass::Screen(ShaderView::Reflection),
    Pass::Skybox,
    Pass::Hud,
];
