//! Fixed-size overlapping frames over a sample buffer

/// Slices a sample buffer into windows of `frame_size` samples advancing by
/// `hop_size`
///
/// A window is emitted at offset `i` only while `i + frame_size < len`, so a
/// buffer no longer than one frame produces no windows and the trailing
/// partial window is never visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalFramer {
    frame_size: usize,
    hop_size: usize,
}

impl SignalFramer {
    /// Frames with explicit hop; both values are floored at 1
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size: frame_size.max(1),
            hop_size: hop_size.max(1),
        }
    }

    /// Frames with 50% overlap
    pub fn half_overlap(frame_size: usize) -> Self {
        Self::new(frame_size, frame_size / 2)
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of windows [`frames`](Self::frames) yields for `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if len <= self.frame_size {
            0
        } else {
            (len - self.frame_size - 1) / self.hop_size + 1
        }
    }

    /// Iterate the windows of `samples` in order
    pub fn frames<'a>(&self, samples: &'a [f32]) -> impl Iterator<Item = &'a [f32]> + 'a {
        let frame_size = self.frame_size;
        let last_start = samples.len().checked_sub(frame_size + 1);
        let starts = match last_start {
            Some(last) => (0..=last).step_by(self.hop_size),
            None => (1..=0).step_by(1),
        };
        starts.map(move |start| &samples[start..start + frame_size])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_buffer_has_no_frames() {
        let framer = SignalFramer::half_overlap(4);
        assert_eq!(framer.frames(&[0.0; 4]).count(), 0);
        assert_eq!(framer.frames(&[]).count(), 0);
        assert_eq!(framer.frame_count(4), 0);
    }

    #[test]
    fn test_frame_offsets_and_count() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let framer = SignalFramer::half_overlap(4);

        let frames: Vec<&[f32]> = framer.frames(&samples).collect();
        // Starts 0, 2, 4 (4 + 4 < 10), 6 is excluded (6 + 4 == 10)
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(frames[2], &[4.0, 5.0, 6.0, 7.0]);
        assert_eq!(framer.frame_count(samples.len()), 3);
    }

    #[test]
    fn test_frame_count_matches_iterator() {
        let framer = SignalFramer::half_overlap(4096);
        for len in [0, 4096, 4097, 8192, 8193, 100_000] {
            let samples = vec![0.0f32; len];
            assert_eq!(framer.frames(&samples).count(), framer.frame_count(len), "len={}", len);
        }
    }

    #[test]
    fn test_zero_sizes_floor_to_one() {
        let framer = SignalFramer::new(0, 0);
        assert_eq!(framer.frame_size(), 1);
        assert_eq!(framer.hop_size(), 1);
        assert_eq!(framer.frames(&[1.0, 2.0, 3.0]).count(), 2);
    }
}
