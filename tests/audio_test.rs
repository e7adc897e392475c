use std::io::Cursor;

use cgmath::Vector3;
use shaderbox::audio::{
    AudioSystem, PlaybackState, attenuated_gain,
    listener::Listener,
    source::Source,
    wav::{WavData, WavFormat},
};
use shaderbox::config::SourceConfig;

fn wav_bytes(channels: u16, bits_per_sample: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 22050,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..64 * channels {
            match bits_per_sample {
                8 => writer.write_sample(0i8).unwrap(),
                16 => writer.write_sample(0i16).unwrap(),
                _ => writer.write_sample(0i32).unwrap(),
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn should_classify_supported_layouts() {
    assert_eq!(WavFormat::classify(1, 8).unwrap(), WavFormat::Mono8);
    assert_eq!(WavFormat::classify(1, 16).unwrap(), WavFormat::Mono16);
    assert_eq!(WavFormat::classify(2, 8).unwrap(), WavFormat::Stereo8);
    assert_eq!(WavFormat::classify(2, 16).unwrap(), WavFormat::Stereo16);
    assert!(WavFormat::Mono16.is_mono());
    assert!(!WavFormat::Stereo8.is_mono());
}

#[test]
fn should_reject_other_layouts() {
    let err = WavFormat::classify(6, 16).unwrap_err();
    assert!(err.to_string().contains("Unrecognized Wave Format"));
}

#[test]
fn should_read_wav_header() {
    let data = WavData::from_bytes(wav_bytes(2, 16)).unwrap();
    assert_eq!(data.format, WavFormat::Stereo16);
    assert_eq!(data.sample_rate, 22050);

    assert!(WavData::from_bytes(wav_bytes(1, 24)).is_err());
    assert!(WavData::from_bytes(b"not a wave file".to_vec()).is_err());
}

#[test]
fn should_attenuate_inverse_distance_clamped() {
    assert_eq!(attenuated_gain(1.0, 2.0, 1.0, 100.0, 1.0), 0.5);
    // Closer than the reference distance is full gain
    assert_eq!(attenuated_gain(0.8, 0.1, 1.0, 100.0, 1.0), 0.8);
    // Beyond the max distance stops attenuating further
    assert_eq!(attenuated_gain(1.0, 50.0, 1.0, 10.0, 1.0), 0.1);
    assert_eq!(attenuated_gain(1.0, 50.0, 0.0, 10.0, 1.0), 1.0);
    assert_eq!(attenuated_gain(1.0, 50.0, 1.0, 100.0, 0.0), 1.0);
}

#[test]
fn should_localize_relative_to_listener() {
    let mut listener = Listener::default();
    let (dir, distance) = listener.localize(Vector3::new(0.0, 0.0, -5.0));
    assert_eq!(dir, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(distance, 5.0);

    // Facing +X, a point at +Z is on the right
    listener.update(Vector3::new(0.0, 0.0, 0.0), Vector3::unit_x(), Vector3::unit_y());
    let (dir, _) = listener.localize(Vector3::new(0.0, 0.0, 2.0));
    assert!((dir.x - 1.0).abs() < 1e-6);

    let (dir, distance) = listener.localize(listener.position);
    assert_eq!((dir, distance), (-Vector3::unit_z(), 0.0));
}

#[test]
fn should_keep_orientation_on_degenerate_update() {
    let mut listener = Listener::default();
    listener.update(Vector3::new(1.0, 2.0, 3.0), Vector3::unit_y(), Vector3::unit_y());
    assert_eq!(listener.position, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(listener.forward, -Vector3::unit_z());
}

#[test]
fn should_track_state_without_output_device() {
    let audio = AudioSystem::disabled();
    assert!(!audio.is_enabled());
    let settings = SourceConfig::new("silent.wav");
    let mut source = Source::new(&audio, "silent", &settings, None);
    assert_eq!(source.state(), PlaybackState::Initial);
    source.play();
    assert_eq!(source.state(), PlaybackState::Playing);
    source.pause();
    assert_eq!(source.state(), PlaybackState::Paused);
    source.play();
    assert_eq!(source.state(), PlaybackState::Playing);
    source.stop();
    assert_eq!(source.state(), PlaybackState::Stopped);
}

#[test]
fn should_stop_when_playback_runs_dry() {
    assert_eq!(PlaybackState::Playing.settle(true), PlaybackState::Stopped);
    assert_eq!(PlaybackState::Playing.settle(false), PlaybackState::Playing);
    // Only a playing source can run dry
    for state in [PlaybackState::Initial, PlaybackState::Paused, PlaybackState::Stopped] {
        assert_eq!(state.settle(true), state);
    }
}

#[test]
fn should_ignore_pause_once_stopped() {
    let audio = AudioSystem::disabled();
    let settings = SourceConfig::new("silent.wav");
    let mut source = Source::new(&audio, "silent", &settings, None);
    source.pause();
    assert_eq!(source.state(), PlaybackState::Initial);

    source.play();
    source.stop();
    source.pause();
    assert_eq!(source.state(), PlaybackState::Stopped);
    // Playing again starts over instead of resuming
    source.play();
    assert_eq!(source.state(), PlaybackState::Playing);
}

#[test]
fn should_gain_by_distance_to_listener() {
    let audio = AudioSystem::disabled();
    let settings = SourceConfig {
        position: [0.0, 0.0, -4.0],
        ..SourceConfig::new("far.wav")
    };
    let mut source = Source::new(&audio, "far", &settings, None);
    assert_eq!(source.gain(&audio.listener), 0.25);
    source.set_position(Vector3::new(0.0, 0.0, 0.0), &audio.listener);
    assert_eq!(source.gain(&audio.listener), 1.0);
}
