use std::collections::VecDeque;

use instant::Duration;

/// Rolling frames-per-second estimate over the last `size` frames.
///
/// The buffer starts out full of zeros, so the reading ramps up over the first `size`
/// frames.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    samples: VecDeque<u32>,
    size: usize,
}

impl FpsCounter {
    /// A `size` of zero is treated as one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            samples: std::iter::repeat_n(0, size).collect(),
            size,
        }
    }

    /// Record a frame that took `dt`. Zero-length frames carry no rate and are ignored.
    pub fn update(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        if secs <= 0.0 {
            return;
        }
        let fps = (1.0 / secs).floor().min(u32::MAX as f64) as u32;
        self.samples.push_front(fps);
        self.samples.truncate(self.size);
    }

    /// Integer mean of the buffered samples.
    pub fn mean(&self) -> u32 {
        let sum: u64 = self.samples.iter().map(|s| *s as u64).sum();
        (sum / self.size as u64) as u32
    }

    pub fn label(&self) -> String {
        format!("FPS: {}", self.mean())
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
