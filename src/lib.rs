pub mod conversion; // Declarative source -> rate -> channel -> sink pipelines
pub mod dsp;
pub mod error;
pub mod graph; // Pull-model flow graph and its nodes
pub mod io;
pub mod resampler; // Multi-channel sample rate conversion

pub use conversion::{ConversionConfig, DataConversionGraph};
pub use error::{FlowGraphError, Result};
pub use graph::{FlowGraph, FlowNode, InputPort, NodeHandle, OutputPort, ProcessContext};
pub use resampler::{MultiChannelResampler, Quality, ResamplerBuilder};

/// Frames held by every port buffer unless the graph is built with another size.
///
/// Too small and the per-node call overhead dominates, too large and the
/// buffers stop fitting in cache.
pub const DEFAULT_FRAMES_PER_BLOCK: usize = 8;
