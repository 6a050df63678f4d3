use std::marker::PhantomData;

use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;
use crate::io::{Sample, I24};

/// End of a chain. The node itself only marks where data leaves the graph;
/// [`crate::FlowGraph::read`] pulls through it and converts to `S`.
pub struct Sink<S: Sample> {
    samples_per_frame: usize,
    _format: PhantomData<fn() -> S>,
}

pub type SinkFloat = Sink<f32>;
pub type SinkI16 = Sink<i16>;
pub type SinkI24 = Sink<I24>;
pub type SinkI32 = Sink<i32>;

impl<S: Sample> Sink<S> {
    pub fn new(samples_per_frame: usize) -> Self {
        assert!(samples_per_frame > 0);
        Self {
            samples_per_frame,
            _format: PhantomData,
        }
    }

    pub fn samples_per_frame(&self) -> usize {
        self.samples_per_frame
    }
}

impl<S: Sample> FlowNode for Sink<S> {
    fn ports(&self) -> PortLayout {
        PortLayout::new().input(self.samples_per_frame)
    }

    fn process(&mut self, _ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        num_frames
    }

    fn name(&self) -> &'static str {
        "sink"
    }
}
