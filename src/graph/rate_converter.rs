use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;
use crate::resampler::MultiChannelResampler;

/// Wraps a [`MultiChannelResampler`] so it can sit in a graph.
///
/// Input and output run at different rates, so the node cannot take its
/// input in lockstep with its output. It pulls upstream blocks itself, at its
/// own input frame position, whenever the resampler wants another frame.
pub struct SampleRateConverter {
    resampler: MultiChannelResampler,
    channel_count: usize,
    input_cursor: usize,
    input_valid: usize,
    input_frame_position: i64,
}

impl SampleRateConverter {
    pub fn new(channel_count: usize, resampler: MultiChannelResampler) -> Self {
        assert!(channel_count > 0);
        Self {
            resampler,
            channel_count,
            input_cursor: 0,
            input_valid: 0,
            input_frame_position: 0,
        }
    }

    pub fn resampler(&self) -> &MultiChannelResampler {
        &self.resampler
    }

    /// Position of the next upstream pull, in input frames.
    pub fn input_frame_position(&self) -> i64 {
        self.input_frame_position
    }

    fn has_input_frame(&mut self, ctx: &mut ProcessContext<'_>) -> bool {
        if self.input_cursor >= self.input_valid {
            let block = ctx.frames_per_block();
            self.input_valid = ctx.pull_input(0, self.input_frame_position, block);
            // Advance by what was asked for, so an exhausted source that gets
            // refilled is pulled again at a fresh position.
            self.input_frame_position += block as i64;
            self.input_cursor = 0;
        }
        self.input_valid > 0
    }
}

impl FlowNode for SampleRateConverter {
    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input(self.channel_count)
            .output(self.channel_count)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        let channels = self.channel_count;
        let mut frames_read = 0;
        while frames_read < num_frames {
            if self.resampler.is_write_ready() {
                if !self.has_input_frame(ctx) {
                    break;
                }
                let start = self.input_cursor * channels;
                let frame = &ctx.input(0)[start..start + channels];
                self.resampler.write_next_frame(frame);
                self.input_cursor += 1;
            } else {
                let start = frames_read * channels;
                let frame = &mut ctx.output(0)[start..start + channels];
                self.resampler.read_next_frame(frame);
                frames_read += 1;
            }
        }
        frames_read
    }

    fn pulls_inputs(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.resampler.reset();
        self.input_cursor = 0;
        self.input_valid = 0;
        self.input_frame_position = 0;
    }

    fn name(&self) -> &'static str {
        "sample_rate_converter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FlowGraph, NodeHandle, SinkFloat, SourceFloat};
    use crate::resampler::Quality;

    fn build(
        input_rate: u32,
        output_rate: u32,
    ) -> (
        FlowGraph,
        NodeHandle<SourceFloat>,
        NodeHandle<SampleRateConverter>,
        NodeHandle<SinkFloat>,
    ) {
        let mut graph = FlowGraph::new();
        let source = graph.add(SourceFloat::new(1));
        let resampler =
            MultiChannelResampler::make(1, input_rate, output_rate, Quality::Medium).unwrap();
        let converter = graph.add(SampleRateConverter::new(1, resampler));
        let sink = graph.add(SinkFloat::new(1));
        graph.connect(source.output(0), converter.input(0));
        graph.connect(converter.output(0), sink.input(0));
        (graph, source, converter, sink)
    }

    #[test]
    fn test_upsampling_doubles_frame_count() {
        let (mut graph, source, _, sink) = build(24_000, 48_000);
        graph.node_mut(source).set_data(&[0.5; 100]);

        let mut out = vec![0.0f32; 400];
        let produced = graph.read(sink, 0, &mut out, 400);
        // Every input frame yields two outputs; the last ones are left
        // waiting for input that never comes.
        assert!((195..=200).contains(&produced), "produced {}", produced);
        for &sample in &out[40..produced] {
            assert!((sample - 0.5).abs() < 1.0e-4);
        }
    }

    #[test]
    fn test_refilled_source_continues() {
        let (mut graph, source, converter, sink) = build(48_000, 24_000);
        let mut out = vec![0.0f32; 200];

        graph.node_mut(source).set_data(&[0.25; 64]);
        let first = graph.read(sink, 0, &mut out, 200);
        assert!(first > 0 && first <= 32);
        assert_eq!(graph.node(converter).resampler().kind(), "polyphase");
        // Every upstream pull asks for one whole block, including the last
        // one that came back empty.
        let position = graph.node(converter).input_frame_position();
        assert!(position > 64 && position % 8 == 0, "position {}", position);

        graph.node_mut(source).set_data(&[0.25; 64]);
        let second = graph.read(sink, 200, &mut out, 200);
        assert!(second >= 30, "second batch produced {}", second);
    }
}
