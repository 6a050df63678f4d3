use std::any::Any;
use std::marker::PhantomData;

use super::port::{InputPort, OutputPort, PortLayout, PortRange};
use super::FlowGraph;

/// Slot index of a node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Lets [`FlowGraph::node_mut`] hand back the concrete node type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Core trait for flow graph nodes.
///
/// A node declares its ports once, in [`FlowNode::ports`], and then
/// processes blocks of at most `frames_per_block` frames. Input data is read
/// and output data written through the [`ProcessContext`].
pub trait FlowNode: AsAny + Send {
    /// Port widths, queried once when the node is added.
    fn ports(&self) -> PortLayout;

    /// Produce up to `num_frames` frames into the output ports and return how
    /// many are valid. Fewer means the data ran out.
    ///
    /// When [`FlowNode::pulls_inputs`] is true every input has already been
    /// pulled and `num_frames` is clamped to what they delivered.
    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize;

    /// Return false to pull inputs from inside `process` with
    /// [`ProcessContext::pull_input`], at a rate the node chooses.
    fn pulls_inputs(&self) -> bool {
        true
    }

    /// Forget any state accumulated while processing.
    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "node"
    }
}

/// Typed, copyable reference to a node living in a [`FlowGraph`].
pub struct NodeHandle<T> {
    pub(crate) id: NodeId,
    pub(crate) inputs: PortRange,
    pub(crate) outputs: PortRange,
    _node: PhantomData<fn() -> T>,
}

impl<T> NodeHandle<T> {
    pub(crate) fn new(id: NodeId, inputs: PortRange, outputs: PortRange) -> Self {
        Self {
            id,
            inputs,
            outputs,
            _node: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's `index`-th input port. Panics if it has no such port.
    pub fn input(&self, index: usize) -> InputPort {
        InputPort(self.inputs.get(index))
    }

    pub fn output(&self, index: usize) -> OutputPort {
        OutputPort(self.outputs.get(index))
    }
}

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeHandle<T> {}

impl<T> std::fmt::Debug for NodeHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHandle")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// A node's view of the graph while it processes.
///
/// Buffers are whole blocks, `frames_per_block * samples_per_frame` long;
/// only the first `num_frames` frames are meaningful.
pub struct ProcessContext<'a> {
    graph: &'a mut FlowGraph,
    inputs: PortRange,
    outputs: PortRange,
}

impl<'a> ProcessContext<'a> {
    pub(crate) fn new(graph: &'a mut FlowGraph, inputs: PortRange, outputs: PortRange) -> Self {
        Self {
            graph,
            inputs,
            outputs,
        }
    }

    pub fn frames_per_block(&self) -> usize {
        self.graph.frames_per_block()
    }

    pub fn input_samples_per_frame(&self, index: usize) -> usize {
        self.graph.inputs[self.inputs.get(index)].samples_per_frame
    }

    pub fn output_samples_per_frame(&self, index: usize) -> usize {
        self.graph.outputs[self.outputs.get(index)].samples_per_frame
    }

    /// Data seen by input `index`: the connected output's block, or the
    /// port's own constant buffer.
    pub fn input(&self, index: usize) -> &[f32] {
        self.graph.input_buffer(InputPort(self.inputs.get(index)))
    }

    pub fn output(&mut self, index: usize) -> &mut [f32] {
        let port = self.outputs.get(index);
        &mut self.graph.outputs[port].buffer
    }

    /// Borrow an input and an output together.
    ///
    /// If the input is connected to this very output (a feedback loop), it
    /// sees the block the output held before this call.
    pub fn io(&mut self, input: usize, output: usize) -> (&[f32], &mut [f32]) {
        let in_index = self.inputs.get(input);
        let out_index = self.outputs.get(output);
        let graph = &mut *self.graph;

        match graph.inputs[in_index].connection {
            None => (
                &graph.inputs[in_index].buffer,
                &mut graph.outputs[out_index].buffer,
            ),
            Some(OutputPort(source)) if source == out_index => {
                let slot = &mut graph.inputs[in_index];
                slot.buffer.copy_from_slice(&graph.outputs[out_index].buffer);
                (&slot.buffer, &mut graph.outputs[out_index].buffer)
            }
            Some(OutputPort(source)) => {
                if source < out_index {
                    let (head, tail) = graph.outputs.split_at_mut(out_index);
                    (&head[source].buffer, &mut tail[0].buffer)
                } else {
                    let (head, tail) = graph.outputs.split_at_mut(source);
                    (&tail[0].buffer, &mut head[out_index].buffer)
                }
            }
        }
    }

    /// Pull input `index` at an explicit frame position, for nodes that
    /// consume input at their own rate.
    pub fn pull_input(&mut self, index: usize, frame_position: i64, num_frames: usize) -> usize {
        let port = InputPort(self.inputs.get(index));
        self.graph.pull_input_port(port, frame_position, num_frames)
    }
}
