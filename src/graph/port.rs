use super::node::NodeId;

/// Index of an input port in the graph's port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputPort(pub(crate) usize);

/// Index of an output port in the graph's port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputPort(pub(crate) usize);

/// Contiguous run of port indices owned by one node.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PortRange {
    pub start: usize,
    pub len: usize,
}

impl PortRange {
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        assert!(
            index < self.len,
            "port {} out of range, node has {}",
            index,
            self.len
        );
        self.start + index
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// An output port owns the block its node writes. Any number of inputs may
/// read it.
pub(crate) struct OutputSlot {
    pub owner: NodeId,
    pub samples_per_frame: usize,
    pub buffer: Vec<f32>,
}

/// An input port either reads a connected output or, when unconnected, its
/// own buffer (a constant set with `FlowGraph::set_input_value`).
pub(crate) struct InputSlot {
    pub samples_per_frame: usize,
    pub buffer: Vec<f32>,
    pub connection: Option<OutputPort>,
}

/// Port widths a node asks for when it is added to a graph.
///
/// ```
/// use flowgraph_dsp::graph::PortLayout;
/// let layout = PortLayout::new().input(1).output(2);
/// assert_eq!(layout.inputs(), &[1]);
/// assert_eq!(layout.outputs(), &[2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortLayout {
    inputs: Vec<usize>,
    outputs: Vec<usize>,
}

impl PortLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input port carrying `samples_per_frame` interleaved channels.
    pub fn input(mut self, samples_per_frame: usize) -> Self {
        assert!(samples_per_frame > 0);
        self.inputs.push(samples_per_frame);
        self
    }

    pub fn output(mut self, samples_per_frame: usize) -> Self {
        assert!(samples_per_frame > 0);
        self.outputs.push(samples_per_frame);
        self
    }

    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }
}
