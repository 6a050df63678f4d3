/*
Mirrored Frame History
======================

An FIR filter needs the last N input frames lined up in memory. A plain ring
buffer would force a modulo on every tap. Instead the buffer is twice as long
as the window and every frame is written to two slots, `cursor` and
`cursor + N`:

  capacity N = 4, after pushing a, b, c, d, e:

    slot:    0  1  2  3 | 4  5  6  7
    value:   d  c  b  e | d  c  b  e     cursor = 3
                      ^-----------^  window() = [e, d, c, b]

The cursor moves backwards, so reading forwards from the cursor always yields
the newest frame first, followed by progressively older frames, with no
wrap-around inside the window.
*/

pub struct FrameHistory {
    samples: Vec<f32>,
    cursor: usize,
    num_frames: usize,
    channel_count: usize,
}

impl FrameHistory {
    pub fn new(num_frames: usize, channel_count: usize) -> Self {
        assert!(num_frames > 0 && channel_count > 0);
        Self {
            samples: vec![0.0; 2 * num_frames * channel_count],
            cursor: 0,
            num_frames,
            channel_count,
        }
    }

    /// Append one interleaved frame, evicting the oldest.
    #[inline]
    pub fn push(&mut self, frame: &[f32]) {
        debug_assert!(frame.len() >= self.channel_count);

        // Move the cursor before writing so it always points at the newest frame.
        self.cursor = if self.cursor == 0 {
            self.num_frames - 1
        } else {
            self.cursor - 1
        };

        let channels = self.channel_count;
        let start = self.cursor * channels;
        let mirror = start + self.num_frames * channels;
        self.samples[start..start + channels].copy_from_slice(&frame[..channels]);
        self.samples[mirror..mirror + channels].copy_from_slice(&frame[..channels]);
    }

    /// The most recent frames, newest first, `num_frames * channel_count` samples.
    #[inline]
    pub fn window(&self) -> &[f32] {
        let start = self.cursor * self.channel_count;
        &self.samples[start..start + self.num_frames * self.channel_count]
    }

    /// The newest frame.
    #[inline]
    pub fn latest(&self) -> &[f32] {
        &self.window()[..self.channel_count]
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn reset(&mut self) {
        self.samples.fill(0.0);
        self.cursor = 0;
    }
}
