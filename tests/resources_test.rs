use std::path::{Path, PathBuf};

use shaderbox::{
    camera::CameraUniform,
    data_structures::instance::InstanceRaw,
    pipelines::{light::LightUniform, shading::ShadingUniform, skybox::cube_vertices},
    resources::{
        ModelFormat, resolve_material_indices,
        skybox::{face_paths, solid_faces},
    },
};

#[test]
fn should_route_models_by_extension() {
    assert_eq!(ModelFormat::from_path(Path::new("a/cube.obj")).unwrap(), ModelFormat::Obj);
    assert_eq!(ModelFormat::from_path(Path::new("a/CUBE.OBJ")).unwrap(), ModelFormat::Obj);
    assert_eq!(ModelFormat::from_path(Path::new("hut.gltf")).unwrap(), ModelFormat::Gltf);
    assert_eq!(ModelFormat::from_path(Path::new("hut.glb")).unwrap(), ModelFormat::Gltf);
    assert!(ModelFormat::from_path(Path::new("hut.fbx")).is_err());
    assert!(ModelFormat::from_path(Path::new("hut")).is_err());
}

#[test]
fn should_send_invalid_materials_to_default() {
    let (resolved, needs_default) = resolve_material_indices(&[Some(0), None, Some(5), Some(1)], 2);
    assert_eq!(resolved, vec![0, 2, 2, 1]);
    assert!(needs_default);

    let (resolved, needs_default) = resolve_material_indices(&[Some(1), Some(0)], 2);
    assert_eq!(resolved, vec![1, 0]);
    assert!(!needs_default);
}

#[test]
fn should_name_skybox_faces_in_cube_order() {
    let faces = ["right", "left", "top", "bottom", "front", "back"].map(String::from);
    let paths = face_paths(Path::new("res/sky"), &faces, "jpg");
    assert_eq!(paths[0], PathBuf::from("res/sky/right.jpg"));
    assert_eq!(paths[5], PathBuf::from("res/sky/back.jpg"));
}

#[test]
fn should_build_solid_fallback_faces() {
    for face in solid_faces([10, 20, 30, 255]) {
        assert_eq!(face.dimensions(), (1, 1));
        assert_eq!(face.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}

#[test]
fn should_build_closed_skybox_cube() {
    let vertices = cube_vertices();
    assert_eq!(vertices.len(), 36);
    assert!(
        vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0))
    );
}

#[test]
fn should_keep_uniforms_16_byte_aligned() {
    assert_eq!(std::mem::size_of::<LightUniform>(), 32);
    assert_eq!(std::mem::size_of::<ShadingUniform>(), 16);
    assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
    assert_eq!(InstanceRaw::SIZE, 100);
}

#[test]
fn should_fall_back_to_neutral_gamma() {
    assert_eq!(ShadingUniform::new(0.0, 0.3).gamma, 2.2);
    assert_eq!(ShadingUniform::new(1.8, 0.3).gamma, 1.8);
    assert_eq!(ShadingUniform::default().displacement, 0.1);
}
