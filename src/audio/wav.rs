use std::{fmt, io::Cursor, path::Path, sync::Arc};

use anyhow::{Context as _, bail};

use crate::resources::texture::load_binary;

/// Sample layouts an audio source can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    Mono8,
    Mono16,
    Stereo8,
    Stereo16,
}

impl WavFormat {
    pub fn classify(channels: u16, bits_per_sample: u16) -> anyhow::Result<Self> {
        match (channels, bits_per_sample) {
            (1, 8) => Ok(WavFormat::Mono8),
            (1, 16) => Ok(WavFormat::Mono16),
            (2, 8) => Ok(WavFormat::Stereo8),
            (2, 16) => Ok(WavFormat::Stereo16),
            _ => bail!("Unrecognized Wave Format: {channels} channels, {bits_per_sample} bits"),
        }
    }

    /// Only mono sources are positioned; stereo plays as recorded.
    pub fn is_mono(self) -> bool {
        matches!(self, WavFormat::Mono8 | WavFormat::Mono16)
    }
}

impl fmt::Display for WavFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WavFormat::Mono8 => "mono 8-bit",
            WavFormat::Mono16 => "mono 16-bit",
            WavFormat::Stereo8 => "stereo 8-bit",
            WavFormat::Stereo16 => "stereo 16-bit",
        };
        f.write_str(s)
    }
}

/// A validated WAV file kept in memory for repeated playback.
#[derive(Debug, Clone)]
pub struct WavData {
    pub bytes: Arc<[u8]>,
    pub format: WavFormat,
    pub sample_rate: u32,
}

impl WavData {
    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let spec = hound::WavReader::new(Cursor::new(bytes.as_slice()))
            .context("not a WAV file")?
            .spec();
        let format = WavFormat::classify(spec.channels, spec.bits_per_sample)?;
        Ok(Self {
            bytes: bytes.into(),
            format,
            sample_rate: spec.sample_rate,
        })
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = load_binary(path).await?;
        Self::from_bytes(bytes).with_context(|| format!("could not load {}", path.display()))
    }
}
