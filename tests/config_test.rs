//! Configuration layering and validation.

use std::{fs, path::PathBuf};

use serial_test::serial;
use shaderbox::config::{AppConfig, ConfigError};

fn config_dir(name: &str, default: Option<&str>, user: Option<&str>) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shaderbox-config-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    if let Some(text) = default {
        fs::write(dir.join("default.toml"), text).unwrap();
    }
    if let Some(text) = user {
        fs::write(dir.join("user.toml"), text).unwrap();
    }
    dir
}

#[test]
#[serial]
fn should_use_builtin_defaults_without_files() {
    let dir = config_dir("empty", None, None);
    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.display.fps_buffer_size, 60);
    assert_eq!(config.scene_path(), PathBuf::from("res/models.scene"));
}

#[test]
#[serial]
fn should_let_user_file_override_default_file() {
    let dir = config_dir(
        "layered",
        Some("[display]\nwidth = 800\nheight = 600\n[render]\ngamma = 1.8\n"),
        Some("[display]\nwidth = 1024\n"),
    );
    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.display.width, 1024);
    assert_eq!(config.display.height, 600);
    assert_eq!(config.render.gamma, 1.8);
    // Untouched sections keep their defaults
    assert_eq!(config.camera, Default::default());
}

#[test]
#[serial]
fn should_let_environment_override_files() {
    let dir = config_dir("env", Some("[display]\ntitle = \"from file\"\n"), None);
    unsafe { std::env::set_var("SHADERBOX_DISPLAY__TITLE", "from env") };
    let result = AppConfig::load_from(&dir);
    unsafe { std::env::remove_var("SHADERBOX_DISPLAY__TITLE") };
    assert_eq!(result.unwrap().display.title, "from env");
}

#[test]
#[serial]
fn should_reject_zero_fps_buffer() {
    let dir = config_dir("fps", Some("[display]\nfps_buffer_size = 0\n"), None);
    match AppConfig::load_from(&dir) {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("fps_buffer_size")),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
#[serial]
fn should_reject_inverted_clip_planes() {
    let dir = config_dir("planes", Some("[display]\nnear_plane = 10.0\nfar_plane = 1.0\n"), None);
    assert!(matches!(AppConfig::load_from(&dir), Err(ConfigError::Invalid(_))));
}

#[test]
#[serial]
fn should_reject_zero_window_size() {
    let dir = config_dir("size", Some("[display]\nwidth = 0\n"), None);
    match AppConfig::load_from(&dir) {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("display size")),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
#[serial]
fn should_reject_out_of_range_fov() {
    for fov in ["0.0", "-30.0", "180.0", "270.0"] {
        let dir = config_dir("fov", Some(&format!("[display]\nfov = {fov}\n")), None);
        match AppConfig::load_from(&dir) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("fov"), "{fov}: {msg}"),
            other => panic!("fov {fov} should be rejected, got {other:?}"),
        }
    }

    let mut config = AppConfig::default();
    config.display.fov = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    config.display.fov = 179.0;
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn should_reject_fov_from_environment() {
    let dir = config_dir("fov-env", None, None);
    unsafe { std::env::set_var("SHADERBOX_DISPLAY__FOV", "0") };
    let result = AppConfig::load_from(&dir);
    unsafe { std::env::remove_var("SHADERBOX_DISPLAY__FOV") };
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
#[serial]
fn should_reject_inverted_pitch_limits() {
    let dir = config_dir(
        "pitch",
        Some("[camera]\npitch_min = 30.0\npitch_max = -30.0\n"),
        None,
    );
    match AppConfig::load_from(&dir) {
        Err(ConfigError::Invalid(msg)) => assert!(msg.contains("pitch_min")),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
#[serial]
fn should_report_malformed_toml() {
    let dir = config_dir("broken", Some("[display\nwidth = "), None);
    assert!(matches!(AppConfig::load_from(&dir), Err(ConfigError::Figment(_))));
}

#[test]
#[serial]
fn should_validate_checked_in_defaults() {
    let config = AppConfig::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config"));
    // The environment may carry overrides, only the file itself is checked here
    if std::env::vars().all(|(k, _)| !k.starts_with("SHADERBOX_")) {
        assert_eq!(config.unwrap(), AppConfig::default());
    }
}
