//! Shader views, frame order and per-view transforms.

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};
use shaderbox::{
    data_structures::{instance::Transform, model::view_instances},
    flow::frame_interval,
    render::{FRAME_PASSES, Pass, ShaderView},
};

#[test]
fn should_give_each_view_a_distinct_slot() {
    let slots: Vec<usize> = ShaderView::ALL.iter().map(|v| v.slot()).collect();
    assert_eq!(slots, (0..ShaderView::COUNT).collect::<Vec<_>>());
}

#[test]
fn should_lay_views_out_along_negative_x() {
    assert_eq!(ShaderView::Basic.offset(10.0), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(ShaderView::Static.offset(10.0), Vector3::new(-10.0, 0.0, 0.0));
    assert_eq!(ShaderView::Reflection.offset(2.5), Vector3::new(-10.0, 0.0, 0.0));
}

#[test]
fn should_run_passes_in_fixed_order() {
    assert_eq!(FRAME_PASSES[0], Pass::Offscreen);
    assert_eq!(FRAME_PASSES[1], Pass::Feedback);
    assert_eq!(FRAME_PASSES[FRAME_PASSES.len() - 2], Pass::Skybox);
    assert_eq!(FRAME_PASSES[FRAME_PASSES.len() - 1], Pass::Hud);

    // Every shader view is drawn on screen exactly once
    for view in ShaderView::ALL {
        let on_screen = FRAME_PASSES
            .iter()
            .filter(|p| p.is_scene_pass() && p.view() == Some(view))
            .count();
        assert_eq!(on_screen, 1, "{view:?}");
    }
    assert!(!Pass::Offscreen.is_scene_pass());
    assert!(!Pass::Hud.is_scene_pass());
}

#[test]
fn should_only_skip_materials_for_reflection() {
    for view in ShaderView::ALL {
        assert_eq!(view.binds_material(), view != ShaderView::Reflection);
    }
}

#[test]
fn should_compose_translation_rotation_and_scale() {
    let transform = Transform::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 90.0, 0.0), 2.0);
    let m = transform.to_matrix();
    // x axis rotated 90 degrees around y ends up on -z, then scaled and translated
    let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
    assert!((p.x - 1.0).abs() < 1e-5);
    assert!((p.y - 2.0).abs() < 1e-5);
    assert!((p.z - 1.0).abs() < 1e-5);

    assert_eq!(Transform::default().to_matrix(), Matrix4::identity());
}

#[test]
fn should_offset_every_view_instance() {
    let transform = Transform::from(Vector3::new(5.0, 1.0, 0.0));
    let instances = view_instances(&transform, 10.0);
    assert_eq!(instances.len(), ShaderView::COUNT);
    for view in ShaderView::ALL {
        let translation = instances[view.slot()].model[3];
        assert_eq!(translation, [5.0 - 10.0 * view.slot() as f32, 1.0, 0.0, 1.0]);
    }
    // The offset only moves the model, it does not rotate normals
    assert!(instances.iter().all(|i| i.normal == instances[0].normal));
}

#[test]
fn should_cap_frames_only_when_asked() {
    assert_eq!(frame_interval(0), None);
    let interval = frame_interval(50).unwrap();
    assert_eq!(interval.as_millis(), 20);
}
