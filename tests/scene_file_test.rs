use std::path::PathBuf;

use cgmath::Vector3;
use shaderbox::resources::scene::SceneFile;

#[test]
fn should_parse_models_in_order() {
    let scene = SceneFile::parse(
        r#"
        [[model]]
        path = "models/a.obj"
        position = [1.0, 2.0, 3.0]
        rotation = [0.0, 90.0, 0.0]
        scale = 2.0
        gamma_correction = false

        [[model]]
        path = "models/b.gltf"
        "#,
    )
    .unwrap();

    assert_eq!(scene.models.len(), 2);
    let first = &scene.models[0];
    assert_eq!(first.path, PathBuf::from("models/a.obj"));
    assert!(!first.gamma_correction);
    let transform = first.transform();
    assert_eq!(transform.position, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(transform.rotation, Vector3::new(0.0, 90.0, 0.0));
    assert_eq!(transform.scale, 2.0);

    let second = &scene.models[1];
    assert_eq!(second.path, PathBuf::from("models/b.gltf"));
    assert_eq!(second.position, [0.0; 3]);
    assert_eq!(second.rotation, [0.0; 3]);
    assert_eq!(second.scale, 1.0);
    assert!(second.gamma_correction);
}

#[test]
fn should_accept_an_empty_scene() {
    let scene = SceneFile::parse("").unwrap();
    assert!(scene.models.is_empty());
}

#[test]
fn should_reject_model_without_path() {
    assert!(SceneFile::parse("[[model]]\nscale = 1.0\n").is_err());
}

#[test]
fn should_parse_checked_in_scene() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/res/models.scene");
    let scene = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(SceneFile::load(path.as_ref()))
        .unwrap();
    assert!(!scene.models.is_empty());
}

#[test]
fn should_fail_on_missing_scene_file() {
    let result = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(SceneFile::load("does/not/exist.scene".as_ref()));
    assert!(result.is_err());
}
