use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;

/// +3 dB, enough headroom for an intersample peak without clipping hard.
pub const DEFAULT_MAX_CLIP: f32 = 1.412_537_5;

pub struct ClipToRange {
    samples_per_frame: usize,
    minimum: f32,
    maximum: f32,
}

impl ClipToRange {
    pub fn new(samples_per_frame: usize) -> Self {
        Self {
            samples_per_frame,
            minimum: -DEFAULT_MAX_CLIP,
            maximum: DEFAULT_MAX_CLIP,
        }
    }

    pub fn set_minimum(&mut self, minimum: f32) {
        self.minimum = minimum;
    }

    pub fn set_maximum(&mut self, maximum: f32) {
        self.maximum = maximum;
    }

    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }
}

impl FlowNode for ClipToRange {
    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input(self.samples_per_frame)
            .output(self.samples_per_frame)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        let len = num_frames * self.samples_per_frame;
        let (minimum, maximum) = (self.minimum, self.maximum);
        let (input, output) = ctx.io(0, 0);
        for (out, &sample) in output[..len].iter_mut().zip(&input[..len]) {
            // max/min rather than clamp, which panics on an inverted range.
            *out = sample.max(minimum).min(maximum);
        }
        num_frames
    }

    fn name(&self) -> &'static str {
        "clip_to_range"
    }
}
