use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;
use crate::io::converter::convert_to_f32;
use crate::io::{Sample, I24};

/// Plays back interleaved samples handed over with [`Source::set_data`],
/// converting them to float. Yields zero frames once the data is used up.
pub struct Source<S: Sample> {
    data: Vec<S>,
    samples_per_frame: usize,
    frame_index: usize,
}

pub type SourceFloat = Source<f32>;
pub type SourceI16 = Source<i16>;
pub type SourceI24 = Source<I24>;
pub type SourceI32 = Source<i32>;

impl<S: Sample> Source<S> {
    pub fn new(samples_per_frame: usize) -> Self {
        assert!(samples_per_frame > 0);
        Self {
            data: Vec::new(),
            samples_per_frame,
            frame_index: 0,
        }
    }

    /// Copy `samples` in and rewind. A trailing partial frame is ignored.
    pub fn set_data(&mut self, samples: &[S]) {
        self.data.clear();
        self.data.extend_from_slice(samples);
        self.frame_index = 0;
    }

    pub fn frames_remaining(&self) -> usize {
        self.data.len() / self.samples_per_frame - self.frame_index
    }

    pub fn samples_per_frame(&self) -> usize {
        self.samples_per_frame
    }
}

impl<S: Sample> FlowNode for Source<S> {
    fn ports(&self) -> PortLayout {
        PortLayout::new().output(self.samples_per_frame)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        let frames = num_frames.min(self.frames_remaining());
        let channels = self.samples_per_frame;
        let start = self.frame_index * channels;
        let len = frames * channels;
        convert_to_f32(&self.data[start..start + len], &mut ctx.output(0)[..len]);
        self.frame_index += frames;
        frames
    }

    fn reset(&mut self) {
        self.frame_index = 0;
    }

    fn name(&self) -> &'static str {
        "source"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FlowGraph, SinkFloat};

    #[test]
    fn test_source_stops_at_end_of_data() {
        let mut graph = FlowGraph::with_frames_per_block(4);
        let source = graph.add(SourceI16::new(2));
        let sink = graph.add(SinkFloat::new(2));
        graph.connect(source.output(0), sink.input(0));

        // Five samples is two whole stereo frames.
        graph
            .node_mut(source)
            .set_data(&[16384, -16384, 0, 8192, 1]);
        assert_eq!(graph.node(source).frames_remaining(), 2);

        let mut out = [0.0f32; 10];
        assert_eq!(graph.read(sink, 0, &mut out, 5), 2);
        assert_eq!(&out[..4], &[0.5, -0.5, 0.0, 0.25]);
        assert_eq!(graph.read(sink, 2, &mut out, 5), 0);
    }

    #[test]
    fn test_set_data_rewinds() {
        let mut graph = FlowGraph::new();
        let source = graph.add(SourceFloat::new(1));
        let sink = graph.add(SinkFloat::new(1));
        graph.connect(source.output(0), sink.input(0));

        let mut out = [0.0f32; 4];
        graph.node_mut(source).set_data(&[1.0, 2.0]);
        assert_eq!(graph.read(sink, 0, &mut out, 4), 2);

        graph.node_mut(source).set_data(&[3.0, 4.0, 5.0]);
        assert_eq!(graph.read(sink, 2, &mut out, 4), 3);
        assert_eq!(&out[..3], &[3.0, 4.0, 5.0]);
    }
}
