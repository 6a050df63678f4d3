use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;

/// Copies a mono input to every channel of its output.
pub struct MonoToMultiConverter {
    output_channels: usize,
}

impl MonoToMultiConverter {
    pub fn new(output_channels: usize) -> Self {
        assert!(output_channels > 0);
        Self { output_channels }
    }
}

impl FlowNode for MonoToMultiConverter {
    fn ports(&self) -> PortLayout {
        PortLayout::new().input(1).output(self.output_channels)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        let channels = self.output_channels;
        let (input, output) = ctx.io(0, 0);
        for (frame, &sample) in output
            .chunks_exact_mut(channels)
            .zip(&input[..num_frames])
        {
            frame.fill(sample);
        }
        num_frames
    }

    fn name(&self) -> &'static str {
        "mono_to_multi"
    }
}
