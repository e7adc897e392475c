//! Minimal positional audio: one listener following the camera and WAV sources
//! placed in the world.
//!
//! Distance attenuation follows the inverse-distance-clamped model. Direction is
//! rendered by a rodio spatial sink whose emitter sits at unit distance from the
//! listener, so rodio only pans and the gain comes from [`attenuated_gain`].

pub mod listener;
pub mod source;
pub mod wav;

use rodio::{OutputStream, OutputStreamHandle};

use crate::audio::listener::Listener;

/// Half the distance between the ears, in listener-space units.
pub const EAR_OFFSET: f32 = 0.1;

/// Playback state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Initial,
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    /// The state once the queued samples are known to be `drained`: a playing
    /// source that ran dry has stopped, every other state is unaffected.
    pub fn settle(self, drained: bool) -> Self {
        match self {
            Self::Playing if drained => Self::Stopped,
            state => state,
        }
    }
}

/// Gain of a source heard from `distance` away.
///
/// `distance` is clamped to `[reference_distance, max_distance]`, then
/// `gain * ref / (ref + rolloff * (d - ref))`. A non-positive reference distance
/// disables attenuation.
pub fn attenuated_gain(
    gain: f32,
    distance: f32,
    reference_distance: f32,
    max_distance: f32,
    rolloff_factor: f32,
) -> f32 {
    if reference_distance <= 0.0 {
        return gain;
    }
    let d = distance.clamp(reference_distance, max_distance.max(reference_distance));
    let denom = reference_distance + rolloff_factor * (d - reference_distance);
    if denom <= 0.0 {
        return gain;
    }
    gain * reference_distance / denom
}

/// The output device and the listener.
pub struct AudioSystem {
    // Dropping the stream stops all playback
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    pub listener: Listener,
}

impl std::fmt::Debug for AudioSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSystem")
            .field("enabled", &self.is_enabled())
            .field("listener", &self.listener)
            .finish()
    }
}

impl AudioSystem {
    /// Open the default output device. Without one, sources stay silent.
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Self {
                _stream: Some(stream),
                handle: Some(handle),
                listener: Listener::default(),
            },
            Err(e) => {
                log::warn!("No audio output available, sound is disabled: {e}");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            _stream: None,
            handle: None,
            listener: Listener::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn handle(&self) -> Option<&OutputStreamHandle> {
        self.handle.as_ref()
    }
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}
