/*
Pull-Model Flow Graph
=====================

Nodes live in an arena owned by `FlowGraph`; ports live in two flat tables
next to it. Nothing points at anything else, connections are indices:

  Source ──out──▶ in──[ SampleRateConverter ]──out──▶ in──[ Sink ]
                                                             │
                                       caller: graph.read(sink, pos, ..)

Reading a sink pulls its input, which pulls the node owning the connected
output, which pulls its own inputs, and so on up to the sources. Every pull
carries a frame position. A node remembers the last position it ran at and
answers any pull at or before it from cache, so:

  - a node feeding two consumers runs once per position (diamonds)
  - a feedback loop sees the previous block instead of recursing forever

While a node runs it is taken out of its slot, which is what lets it hold a
`&mut FlowGraph` (through `ProcessContext`) and pull further upstream.
*/

/// Clamp each sample to a range.
pub mod clip;
/// Soft saturation to +-sqrt(2).
pub mod limiter;
/// Duplicate a mono signal to N channels.
pub mod mono_to_multi;
/// Core traits and handles shared by all nodes.
pub mod node;
/// Port indices and layouts.
pub mod port;
/// Linear gain ramps.
pub mod ramp;
/// Sample rate conversion as a node.
pub mod rate_converter;
/// Typed sink nodes, the point where the caller pulls.
pub mod sink;
/// Typed source nodes fed from caller buffers.
pub mod source;

pub use clip::ClipToRange;
pub use limiter::Limiter;
pub use mono_to_multi::MonoToMultiConverter;
pub use node::{AsAny, FlowNode, NodeHandle, NodeId, ProcessContext};
pub use port::{InputPort, OutputPort, PortLayout};
#[cfg(feature = "rtrb")]
pub use ramp::RampHandle;
pub use ramp::RampLinear;
pub use rate_converter::SampleRateConverter;
pub use sink::{Sink, SinkFloat, SinkI16, SinkI24, SinkI32};
pub use source::{Source, SourceFloat, SourceI16, SourceI24, SourceI32};

use crate::io::{converter::convert_from_f32, Sample};
use crate::DEFAULT_FRAMES_PER_BLOCK;
use port::{InputSlot, OutputSlot, PortRange};

struct NodeSlot {
    // None while the node is inside its own `process`.
    processor: Option<Box<dyn FlowNode>>,
    inputs: PortRange,
    outputs: PortRange,
    pulls_inputs: bool,
    last_frame_position: i64,
    frames_valid: usize,
}

pub struct FlowGraph {
    nodes: Vec<NodeSlot>,
    pub(crate) inputs: Vec<InputSlot>,
    pub(crate) outputs: Vec<OutputSlot>,
    frames_per_block: usize,
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::with_frames_per_block(DEFAULT_FRAMES_PER_BLOCK)
    }

    pub fn with_frames_per_block(frames_per_block: usize) -> Self {
        assert!(frames_per_block > 0, "frames per block must be at least 1");
        Self {
            nodes: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            frames_per_block,
        }
    }

    pub fn frames_per_block(&self) -> usize {
        self.frames_per_block
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Move a node into the graph and allocate its port buffers.
    pub fn add<T: FlowNode>(&mut self, node: T) -> NodeHandle<T> {
        let id = NodeId(self.nodes.len());
        let layout = node.ports();
        let block = self.frames_per_block;

        let inputs = PortRange {
            start: self.inputs.len(),
            len: layout.inputs().len(),
        };
        for &samples_per_frame in layout.inputs() {
            self.inputs.push(InputSlot {
                samples_per_frame,
                buffer: vec![0.0; block * samples_per_frame],
                connection: None,
            });
        }

        let outputs = PortRange {
            start: self.outputs.len(),
            len: layout.outputs().len(),
        };
        for &samples_per_frame in layout.outputs() {
            self.outputs.push(OutputSlot {
                owner: id,
                samples_per_frame,
                buffer: vec![0.0; block * samples_per_frame],
            });
        }

        self.nodes.push(NodeSlot {
            pulls_inputs: node.pulls_inputs(),
            processor: Some(Box::new(node)),
            inputs,
            outputs,
            last_frame_position: -1,
            frames_valid: 0,
        });
        NodeHandle::new(id, inputs, outputs)
    }

    pub fn node<T: FlowNode>(&self, handle: NodeHandle<T>) -> &T {
        let node: &dyn FlowNode = match self.nodes[handle.id.0].processor.as_deref() {
            Some(node) => node,
            None => panic!("node {:?} is busy processing", handle.id),
        };
        match node.as_any().downcast_ref::<T>() {
            Some(node) => node,
            None => panic!("handle {:?} does not match node {}", handle, node.name()),
        }
    }

    /// Access a node's own API (targets, ranges, source data) between pulls.
    pub fn node_mut<T: FlowNode>(&mut self, handle: NodeHandle<T>) -> &mut T {
        let node: &mut dyn FlowNode = match self.nodes[handle.id.0].processor.as_deref_mut() {
            Some(node) => node,
            None => panic!("node {:?} is busy processing", handle.id),
        };
        let name = node.name();
        match node.as_any_mut().downcast_mut::<T>() {
            Some(node) => node,
            None => panic!("handle {:?} does not match node {}", handle, name),
        }
    }

    /// Connect `output` to `input`, replacing whatever `input` was connected to.
    pub fn connect(&mut self, output: OutputPort, input: InputPort) {
        let output_width = self.outputs[output.0].samples_per_frame;
        let slot = &mut self.inputs[input.0];
        assert_eq!(
            output_width, slot.samples_per_frame,
            "cannot connect ports with different samples per frame"
        );
        if let Some(previous) = slot.connection.replace(output) {
            tracing::trace!(?input, ?previous, ?output, "input port reconnected");
        }
    }

    /// Break the connection between `output` and `input`. Panics if they are
    /// not connected to each other.
    pub fn disconnect(&mut self, output: OutputPort, input: InputPort) {
        let slot = &mut self.inputs[input.0];
        assert_eq!(
            slot.connection,
            Some(output),
            "input {:?} is not connected to {:?}",
            input,
            output
        );
        slot.connection = None;
    }

    pub fn disconnect_input(&mut self, input: InputPort) {
        self.inputs[input.0].connection = None;
    }

    pub fn is_connected(&self, input: InputPort) -> Option<OutputPort> {
        self.inputs[input.0].connection
    }

    /// Fill an input's own buffer, which it reads while unconnected.
    pub fn set_input_value(&mut self, input: InputPort, value: f32) {
        self.inputs[input.0].buffer.fill(value);
    }

    pub(crate) fn input_buffer(&self, input: InputPort) -> &[f32] {
        let slot = &self.inputs[input.0];
        match slot.connection {
            Some(output) => &self.outputs[output.0].buffer,
            None => &slot.buffer,
        }
    }

    /// Run `node` for the block starting at `frame_position` unless it already
    /// ran there, and return its valid frame count.
    pub fn pull<T>(&mut self, node: NodeHandle<T>, frame_position: i64, num_frames: usize) -> usize {
        self.pull_node(node.id, frame_position, num_frames)
    }

    pub(crate) fn pull_input_port(
        &mut self,
        input: InputPort,
        frame_position: i64,
        num_frames: usize,
    ) -> usize {
        match self.inputs[input.0].connection {
            Some(output) => self.pull_output_port(output, frame_position, num_frames),
            None => num_frames.min(self.frames_per_block),
        }
    }

    fn pull_output_port(&mut self, output: OutputPort, frame_position: i64, num_frames: usize) -> usize {
        let owner = self.outputs[output.0].owner;
        let num_frames = num_frames.min(self.frames_per_block);
        self.pull_node(owner, frame_position, num_frames)
    }

    fn pull_node(&mut self, id: NodeId, frame_position: i64, num_frames: usize) -> usize {
        let slot = &mut self.nodes[id.0];
        // Reached through a feedback loop: the outputs still hold the
        // previous block.
        let Some(mut processor) = slot.processor.take() else {
            return num_frames;
        };
        if frame_position <= slot.last_frame_position {
            slot.processor = Some(processor);
            return slot.frames_valid.min(num_frames);
        }
        let previous_position = slot.last_frame_position;
        slot.last_frame_position = frame_position;
        let inputs = slot.inputs;
        let outputs = slot.outputs;
        let pulls_inputs = slot.pulls_inputs;

        let mut frames = num_frames.min(self.frames_per_block);
        if pulls_inputs {
            for index in inputs.indices() {
                frames = frames.min(self.pull_input_port(InputPort(index), frame_position, frames));
            }
        }
        if frames > 0 {
            let mut ctx = ProcessContext::new(self, inputs, outputs);
            frames = processor.process(&mut ctx, frames);
        }

        let slot = &mut self.nodes[id.0];
        slot.processor = Some(processor);
        slot.frames_valid = frames;
        // Nothing was produced, so leave the position open for a retry once
        // the sources have been refilled.
        if frames == 0 {
            slot.last_frame_position = previous_position;
        }
        frames
    }

    /// Pull `num_frames` frames through `sink` starting at `frame_position`,
    /// converting into `out`. Returns the frames written, fewer when the
    /// sources run dry.
    pub fn read<S: Sample>(
        &mut self,
        sink: NodeHandle<Sink<S>>,
        frame_position: i64,
        out: &mut [S],
        num_frames: usize,
    ) -> usize {
        assert!(
            frame_position >= self.nodes[sink.id.0].last_frame_position,
            "sink read at a decreasing frame position"
        );
        let input = sink.input(0);
        let samples_per_frame = self.inputs[input.0].samples_per_frame;
        let num_frames = num_frames.min(out.len() / samples_per_frame);

        let mut position = frame_position;
        let mut frames_read = 0;
        while frames_read < num_frames {
            let wanted = (num_frames - frames_read).min(self.frames_per_block);
            let pulled = self.pull_node(sink.id, position, wanted).min(wanted);
            if pulled == 0 {
                break;
            }
            let start = frames_read * samples_per_frame;
            let len = pulled * samples_per_frame;
            convert_from_f32(&self.input_buffer(input)[..len], &mut out[start..start + len]);
            frames_read += pulled;
            position += pulled as i64;
            if pulled < wanted {
                break;
            }
        }
        frames_read
    }

    /// Clear memoized positions and node state from `node` upstream, so the
    /// graph can run again from frame position 0.
    pub fn reset<T>(&mut self, node: NodeHandle<T>) {
        let mut visited = vec![false; self.nodes.len()];
        self.reset_node(node.id, &mut visited);
    }

    fn reset_node(&mut self, id: NodeId, visited: &mut [bool]) {
        if visited[id.0] {
            return;
        }
        visited[id.0] = true;

        let slot = &mut self.nodes[id.0];
        slot.last_frame_position = -1;
        slot.frames_valid = 0;
        if let Some(processor) = slot.processor.as_mut() {
            processor.reset();
        }
        let inputs = slot.inputs;
        for index in inputs.indices() {
            if let Some(output) = self.inputs[index].connection {
                let owner = self.outputs[output.0].owner;
                self.reset_node(owner, visited);
            }
        }
    }
}
