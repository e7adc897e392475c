use instant::Duration;
use shaderbox::hud::{anchor_top_right, fps::FpsCounter};

#[test]
fn should_average_over_buffer() {
    let mut fps = FpsCounter::new(4);
    for _ in 0..4 {
        fps.update(Duration::from_millis(10));
    }
    assert_eq!(fps.mean(), 100);
    assert_eq!(fps.label(), "FPS: 100");
}

#[test]
fn should_ramp_up_from_zeros() {
    let mut fps = FpsCounter::new(4);
    assert_eq!(fps.mean(), 0);
    fps.update(Duration::from_millis(10));
    fps.update(Duration::from_millis(10));
    assert_eq!(fps.mean(), 50);
}

#[test]
fn should_drop_oldest_samples() {
    let mut fps = FpsCounter::new(2);
    fps.update(Duration::from_millis(100));
    fps.update(Duration::from_millis(10));
    fps.update(Duration::from_millis(10));
    assert_eq!(fps.mean(), 100);
}

#[test]
fn should_ignore_zero_frame_time() {
    let mut fps = FpsCounter::new(1);
    fps.update(Duration::from_millis(20));
    fps.update(Duration::ZERO);
    assert_eq!(fps.mean(), 50);
    assert_eq!(FpsCounter::new(0).size(), 1);
}

#[test]
fn should_anchor_text_to_top_right() {
    assert_eq!(anchor_top_right(800.0, 100.0, 10.0), 690.0);
    assert_eq!(anchor_top_right(50.0, 100.0, 10.0), 0.0);
}
