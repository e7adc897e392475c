//! Framebuffer feedback on a headless device.

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
use common::test_utils::{HeadlessGpu, TEST_FORMAT};
#[cfg(feature = "integration-tests")]
use shaderbox::{
    data_structures::{framebuffer::FrameBufferObject, instance::Transform, model::Model},
    scene::{Scene, feedback_bind_group},
};

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_disable_feedback_for_empty_scene() {
    let gpu = HeadlessGpu::new().await.unwrap();
    let scene = Scene::new(
        &gpu.device,
        &gpu.layouts,
        Vec::new(),
        gpu.skybox(),
        [320, 240],
        TEST_FORMAT,
        2.0,
    );
    assert!(!scene.has_feedback());
    assert_eq!(scene.framebuffer().size(), [320, 240]);
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_bind_framebuffer_to_first_mesh_of_first_model() {
    let gpu = HeadlessGpu::new().await.unwrap();
    let cube = gpu.load_cube().await;
    let material_count = cube.materials.len();
    let diffuse = &cube.materials[cube.meshes[0].material].diffuse_texture.texture;
    let (diffuse_size, diffuse_format) = (diffuse.size(), diffuse.format());

    let scene = Scene::new(
        &gpu.device,
        &gpu.layouts,
        vec![cube],
        gpu.skybox(),
        [320, 240],
        TEST_FORMAT,
        2.0,
    );
    assert!(scene.has_feedback());

    // The override is a separate bind group, the material keeps its own texture
    let cube = &scene.models[0];
    assert_eq!(cube.materials.len(), material_count);
    let diffuse = &cube.materials[cube.meshes[0].material].diffuse_texture.texture;
    assert_eq!(diffuse.size(), diffuse_size);
    assert_eq!(diffuse.format(), diffuse_format);
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_disable_feedback_when_first_model_has_no_meshes() {
    let gpu = HeadlessGpu::new().await.unwrap();
    let empty = Model::new(
        &gpu.device,
        "empty",
        Vec::new(),
        Vec::new(),
        std::path::PathBuf::new(),
        Transform::default(),
        true,
    );
    let cube = gpu.load_cube().await;
    let framebuffer = FrameBufferObject::new(&gpu.device, [64, 64], TEST_FORMAT);

    // Only the first model is ever the target
    let models = vec![empty, cube];
    assert!(feedback_bind_group(&gpu.device, &gpu.layouts.material, &models, &framebuffer).is_none());
    assert!(feedback_bind_group(&gpu.device, &gpu.layouts.material, &models[1..], &framebuffer).is_some());
    assert!(feedback_bind_group(&gpu.device, &gpu.layouts.material, &[], &framebuffer).is_none());
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_rebind_feedback_after_resize() {
    let gpu = HeadlessGpu::new().await.unwrap();
    let cube = gpu.load_cube().await;
    let mut scene = Scene::new(
        &gpu.device,
        &gpu.layouts,
        vec![cube],
        gpu.skybox(),
        [320, 240],
        TEST_FORMAT,
        2.0,
    );

    scene.resize_to(&gpu.device, &gpu.layouts, [800, 600], TEST_FORMAT);
    assert!(scene.has_feedback());
    assert_eq!(scene.framebuffer().size(), [800, 600]);

    // A minimised window still gets a usable framebuffer
    scene.resize_to(&gpu.device, &gpu.layouts, [0, 0], TEST_FORMAT);
    assert!(scene.has_feedback());
    assert_eq!(scene.framebuffer().size(), [1, 1]);
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_create_depth_targets_without_sampler() {
    use shaderbox::data_structures::texture::Texture;

    let gpu = HeadlessGpu::new().await.unwrap();
    let depth = Texture::create_depth_texture(&gpu.device, [0, 16], "depth");
    assert!(depth.sampler.is_none());
    assert_eq!(depth.texture.format(), Texture::DEPTH_FORMAT);
    assert_eq!((depth.texture.width(), depth.texture.height()), (1, 16));

    let framebuffer = FrameBufferObject::new(&gpu.device, [16, 16], TEST_FORMAT);
    assert!(framebuffer.colour_texture().sampler.is_some());
}
