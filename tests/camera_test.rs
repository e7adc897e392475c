use cgmath::{Deg, Rad, Vector3};
use instant::Duration;
use shaderbox::{
    camera::{Camera, CameraController},
    config::CameraConfig,
};
use winit::{event::ElementState, keyboard::KeyCode};

fn controller() -> CameraController {
    CameraController::from_config(&CameraConfig {
        movement_speed: 10.0,
        ..Default::default()
    })
}

#[test]
fn should_move_along_yaw_in_horizontal_plane() {
    let mut camera = Camera::new([0.0, 0.0, 0.0], Deg(0.0), Deg(45.0));
    let mut controller = controller();
    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    controller.update(&mut camera, Duration::from_millis(500));
    assert!((camera.position.x - 5.0).abs() < 1e-5);
    assert!(camera.position.y.abs() < 1e-5);

    controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
    controller.update(&mut camera, Duration::from_millis(500));
    assert!((camera.position.x - 5.0).abs() < 1e-5);
}

#[test]
fn should_ignore_unbound_keys() {
    let mut controller = controller();
    assert!(!controller.process_keyboard(KeyCode::KeyQ, ElementState::Pressed));
}

#[test]
fn should_clamp_pitch() {
    let mut camera = Camera::new([0.0, 0.0, 0.0], Deg(0.0), Deg(0.0));
    let mut controller = controller();
    controller.process_mouse(0.0, 1.0e6);
    controller.update(&mut camera, Duration::from_millis(16));
    let min: Rad<f32> = Deg(-89.0).into();
    assert!((camera.pitch.0 - min.0).abs() < 1e-5);
}

#[test]
fn should_clamp_starting_pitch() {
    let controller = controller();
    let mut camera = Camera::new([0.0, 0.0, 0.0], Deg(0.0), Deg(120.0));
    controller.clamp_pitch(&mut camera);
    let max: Rad<f32> = Deg(89.0).into();
    assert!((camera.pitch.0 - max.0).abs() < 1e-5);

    let mut camera = Camera::new([0.0, 0.0, 0.0], Deg(0.0), Deg(30.0));
    controller.clamp_pitch(&mut camera);
    let start: Rad<f32> = Deg(30.0).into();
    assert!((camera.pitch.0 - start.0).abs() < 1e-6);
}

#[test]
fn should_look_along_negative_z_at_minus_90_yaw() {
    let camera = Camera::new([0.0, 0.0, 0.0], Deg(-90.0), Deg(0.0));
    let forward = camera.forward();
    let expected = Vector3::new(0.0, 0.0, -1.0);
    assert!((forward.x - expected.x).abs() < 1e-5);
    assert!((forward.z - expected.z).abs() < 1e-5);
}
