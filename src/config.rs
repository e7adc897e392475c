//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`SHADERBOX_SECTION__KEY`)

use std::fmt;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub hud: HudConfig,
}

impl AppConfig {
    /// Load configuration from the `config` directory next to the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SHADERBOX_DISPLAY__WIDTH=800 -> display.width = 800
        figment = figment.merge(Env::prefixed("SHADERBOX_").split("__"));

        let config: AppConfig = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.display;
        if d.width == 0 || d.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero, got {}x{}",
                d.width, d.height
            )));
        }
        if d.fps_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "display.fps_buffer_size must be at least 1".to_string(),
            ));
        }
        if d.near_plane <= 0.0 || d.far_plane <= d.near_plane {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                d.near_plane, d.far_plane
            )));
        }
        if !d.fov.is_finite() || d.fov <= 0.0 || d.fov >= 180.0 {
            return Err(ConfigError::Invalid(format!(
                "display.fov must lie in (0, 180) degrees, got {}",
                d.fov
            )));
        }
        if self.camera.pitch_min >= self.camera.pitch_max {
            return Err(ConfigError::Invalid(format!(
                "camera.pitch_min ({}) must be below camera.pitch_max ({})",
                self.camera.pitch_min, self.camera.pitch_max
            )));
        }
        Ok(())
    }

    /// Absolute-or-relative path of the scene description file.
    pub fn scene_path(&self) -> PathBuf {
        self.assets.root.join(&self.assets.scene)
    }
}

/// Window and frame timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Number of frame samples averaged by the FPS counter
    pub fps_buffer_size: usize,
    /// Upper bound on frames per second, `0` disables the cap
    pub fps_cap: u32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "shaderbox".to_string(),
            width: 1280,
            height: 720,
            fps_buffer_size: 60,
            fps_cap: 144,
            near_plane: 0.1,
            far_plane: 1000.0,
            fov: 70.0,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub start_position: [f32; 3],
    /// Initial yaw in degrees
    pub yaw: f32,
    /// Initial pitch in degrees
    pub pitch: f32,
    /// Units per second
    pub movement_speed: f32,
    /// Radians per mouse motion unit
    pub look_speed: f32,
    /// Pitch limits in degrees
    pub pitch_min: f32,
    pub pitch_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [-20.0, 2.0, 12.0],
            yaw: -90.0,
            pitch: -5.0,
            movement_speed: 10.0,
            look_speed: 0.004,
            pitch_min: -89.0,
            pitch_max: 89.0,
        }
    }
}

/// Where assets live on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub root: PathBuf,
    /// Scene description file, relative to `root`
    pub scene: PathBuf,
    /// Skybox face directory, relative to `root`
    pub skybox: PathBuf,
    /// Face file stems in +X, -X, +Y, -Y, +Z, -Z order
    pub skybox_faces: [String; 6],
    pub skybox_extension: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("res"),
            scene: PathBuf::from("models.scene"),
            skybox: PathBuf::from("skyboxDay"),
            skybox_faces: ["right", "left", "top", "bottom", "front", "back"].map(String::from),
            skybox_extension: "png".to_string(),
        }
    }
}

/// Shading and pass layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub clear_colour: [f64; 4],
    /// Distance along -X between consecutive shader views of the scene
    pub pass_spacing: f32,
    pub gamma: f32,
    /// Subdivision iterations for the tessellation view
    pub tessellation_level: u32,
    /// Displacement strength of the tessellation view
    pub displacement: f32,
    pub light_position: [f32; 3],
    pub light_colour: [f32; 3],
    /// Used for every skybox face when the faces cannot be loaded
    pub skybox_fallback_colour: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_colour: [0.0, 1.0, 1.0, 1.0],
            pass_spacing: 10.0,
            gamma: 2.2,
            tessellation_level: 2,
            displacement: 0.1,
            light_position: [60.0, 100.0, 100.0],
            light_colour: [1.0, 1.0, 1.0],
            skybox_fallback_colour: [135, 190, 235, 255],
        }
    }
}

impl RenderConfig {
    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}

/// Parameters of one positional audio source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// WAV file, relative to the asset root
    pub file: PathBuf,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub pitch: f32,
    pub gain: f32,
    pub reference_distance: f32,
    pub max_distance: f32,
    pub rolloff_factor: f32,
    pub looping: bool,
}

impl SourceConfig {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            position: [0.0; 3],
            velocity: [0.0; 3],
            pitch: 1.0,
            gain: 1.0,
            reference_distance: 1.0,
            max_distance: f32::MAX,
            rolloff_factor: 1.0,
            looping: false,
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Started once the scene has loaded
    pub ambient: SourceConfig,
    /// Played on key `0`, follows the camera
    pub trigger: SourceConfig,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ambient: SourceConfig {
                position: [-4.25, 0.125, -4.25],
                reference_distance: 0.0,
                max_distance: 10.0,
                ..SourceConfig::new("audio/ambientMono.wav")
            },
            trigger: SourceConfig::new("audio/heavy.wav"),
        }
    }
}

/// On-screen text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudConfig {
    pub font_size: f32,
    pub line_height: f32,
    pub colour: [u8; 3],
    /// Distance in pixels from the top right corner
    pub margin: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            font_size: 30.0,
            line_height: 42.0,
            colour: [0, 255, 0],
            margin: 10.0,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    /// Figment could not read or deserialize a source
    Figment(Box<figment::Error>),
    /// Values were read but are unusable
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Figment(e) => write!(f, "Configuration error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Figment(e) => Some(e.as_ref()),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(Box::new(e))
    }
}
