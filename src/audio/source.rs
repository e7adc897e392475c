use std::{io::Cursor, path::Path, sync::Arc};

use cgmath::Vector3;
use rodio::{Decoder, Source as _, SpatialSink};

use crate::{
    audio::{
        AudioSystem, EAR_OFFSET, PlaybackState, attenuated_gain,
        listener::Listener,
        wav::WavData,
    },
    config::SourceConfig,
};

/// A sound placed in the world.
///
/// A source whose file cannot be loaded, or created without an output device, keeps
/// track of its state but produces no sound.
pub struct Source {
    pub name: String,
    settings: SourceConfig,
    data: Option<WavData>,
    sink: Option<SpatialSink>,
    position: Vector3<f32>,
    state: PlaybackState,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("audible", &self.sink.is_some())
            .finish()
    }
}

impl Source {
    /// Load `settings.file` relative to `asset_root`.
    pub async fn load(audio: &AudioSystem, asset_root: &Path, settings: &SourceConfig) -> Self {
        let path = asset_root.join(&settings.file);
        let data = match WavData::load(&path).await {
            Ok(data) => {
                log::debug!(
                    "Loaded {} ({}, {} Hz)",
                    path.display(),
                    data.format,
                    data.sample_rate
                );
                Some(data)
            }
            Err(e) => {
                log::error!("Audio source stays silent: {e:#}");
                None
            }
        };
        Self::new(audio, &path.display().to_string(), settings, data)
    }

    pub fn new(audio: &AudioSystem, name: &str, settings: &SourceConfig, data: Option<WavData>) -> Self {
        let sink = match (audio.handle(), &data) {
            (Some(handle), Some(_)) => {
                match SpatialSink::try_new(
                    handle,
                    [0.0, 0.0, -1.0],
                    [-EAR_OFFSET, 0.0, 0.0],
                    [EAR_OFFSET, 0.0, 0.0],
                ) {
                    Ok(sink) => {
                        sink.pause();
                        sink.set_speed(if settings.pitch > 0.0 { settings.pitch } else { 1.0 });
                        Some(sink)
                    }
                    Err(e) => {
                        log::warn!("Could not open a sink for {name}: {e}");
                        None
                    }
                }
            }
            _ => None,
        };
        let mut source = Self {
            name: name.to_string(),
            settings: settings.clone(),
            data,
            sink,
            position: settings.position.into(),
            state: PlaybackState::Initial,
        };
        source.update(&audio.listener);
        source
    }

    /// Start from the beginning, or resume if paused.
    pub fn play(&mut self) {
        if self.sync_state() == PlaybackState::Paused {
            if let Some(sink) = &self.sink {
                sink.play();
            }
            self.state = PlaybackState::Playing;
            return;
        }
        if let (Some(sink), Some(data)) = (&self.sink, &self.data) {
            sink.stop();
            match Decoder::new(Cursor::new(Arc::clone(&data.bytes))) {
                Ok(decoder) if self.settings.looping => sink.append(decoder.repeat_infinite()),
                Ok(decoder) => sink.append(decoder),
                Err(e) => {
                    log::error!("{} could not be decoded: {e}", self.name);
                    return;
                }
            }
            sink.play();
        }
        self.state = PlaybackState::Playing;
    }

    /// Pausing is a no-op unless the source is playing.
    pub fn pause(&mut self) {
        if self.sync_state() != PlaybackState::Playing {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        self.state = PlaybackState::Paused;
    }

    pub fn stop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
        self.state = PlaybackState::Stopped;
    }

    /// Current state. A non-looping source that ran out of samples is stopped.
    pub fn state(&self) -> PlaybackState {
        let drained = self.sink.as_ref().is_some_and(SpatialSink::empty);
        self.state.settle(drained)
    }

    fn sync_state(&mut self) -> PlaybackState {
        self.state = self.state();
        self.state
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3<f32>, listener: &Listener) {
        self.position = position;
        self.update(listener);
    }

    /// Velocity is kept for completeness; Doppler shift is not modelled.
    pub fn velocity(&self) -> Vector3<f32> {
        self.settings.velocity.into()
    }

    /// The gain this source is currently heard with.
    pub fn gain(&self, listener: &Listener) -> f32 {
        let (_, distance) = listener.localize(self.position);
        let s = &self.settings;
        attenuated_gain(s.gain, distance, s.reference_distance, s.max_distance, s.rolloff_factor)
    }

    /// Re-pan and re-attenuate for the listener's current pose.
    pub fn update(&mut self, listener: &Listener) {
        let Some(sink) = &self.sink else {
            return;
        };
        let gain = self.gain(listener);
        let mono = self.data.as_ref().is_some_and(|d| d.format.is_mono());
        let (direction, _) = listener.localize(self.position);
        // Stereo files keep their own channel layout: centre them
        let emitter = if mono { direction } else { -Vector3::unit_z() };
        sink.set_emitter_position(emitter.into());
        sink.set_volume(gain);
    }
}
