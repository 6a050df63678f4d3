//! Ready-made pipelines from one stream format to another.
//!
//! A [`DataConversionGraph`] is assembled from a [`ConversionConfig`]:
//!
//! ```text
//! Source<format> -> [SampleRateConverter] -> [MonoToMultiConverter] -> Sink<format>
//! ```
//!
//! Stages that have nothing to do are left out. Rate conversion runs before
//! channel expansion so the resampler works on as few channels as possible.

use crate::error::{FlowGraphError, Result};
use crate::graph::{
    FlowGraph, MonoToMultiConverter, NodeHandle, OutputPort, SampleRateConverter, SinkFloat,
    SinkI16, SinkI24, SinkI32, SourceFloat, SourceI16, SourceI24, SourceI32,
};
use crate::io::{AudioFormat, SampleSlice, SampleSliceMut};
use crate::resampler::{MultiChannelResampler, Quality};
use crate::DEFAULT_FRAMES_PER_BLOCK;

/// Describes both ends of a conversion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionConfig {
    pub source_format: AudioFormat,
    pub source_channels: usize,
    pub source_rate: u32,
    pub sink_format: AudioFormat,
    pub sink_channels: usize,
    pub sink_rate: u32,
    pub quality: Quality,
    pub frames_per_block: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source_format: AudioFormat::F32,
            source_channels: 2,
            source_rate: 48_000,
            sink_format: AudioFormat::F32,
            sink_channels: 2,
            sink_rate: 48_000,
            quality: Quality::default(),
            frames_per_block: DEFAULT_FRAMES_PER_BLOCK,
        }
    }
}

enum SourceNode {
    F32(NodeHandle<SourceFloat>),
    I16(NodeHandle<SourceI16>),
    I24(NodeHandle<SourceI24>),
    I32(NodeHandle<SourceI32>),
}

impl SourceNode {
    fn add(graph: &mut FlowGraph, format: AudioFormat, channels: usize) -> Self {
        match format {
            AudioFormat::F32 => Self::F32(graph.add(SourceFloat::new(channels))),
            AudioFormat::I16 => Self::I16(graph.add(SourceI16::new(channels))),
            AudioFormat::I24Packed => Self::I24(graph.add(SourceI24::new(channels))),
            AudioFormat::I32 => Self::I32(graph.add(SourceI32::new(channels))),
        }
    }

    fn output(&self) -> OutputPort {
        match self {
            Self::F32(h) => h.output(0),
            Self::I16(h) => h.output(0),
            Self::I24(h) => h.output(0),
            Self::I32(h) => h.output(0),
        }
    }
}

enum SinkNode {
    F32(NodeHandle<SinkFloat>),
    I16(NodeHandle<SinkI16>),
    I24(NodeHandle<SinkI24>),
    I32(NodeHandle<SinkI32>),
}

impl SinkNode {
    fn add(graph: &mut FlowGraph, format: AudioFormat, channels: usize) -> Self {
        match format {
            AudioFormat::F32 => Self::F32(graph.add(SinkFloat::new(channels))),
            AudioFormat::I16 => Self::I16(graph.add(SinkI16::new(channels))),
            AudioFormat::I24Packed => Self::I24(graph.add(SinkI24::new(channels))),
            AudioFormat::I32 => Self::I32(graph.add(SinkI32::new(channels))),
        }
    }

    fn connect_from(&self, graph: &mut FlowGraph, output: OutputPort) {
        let input = match self {
            Self::F32(h) => h.input(0),
            Self::I16(h) => h.input(0),
            Self::I24(h) => h.input(0),
            Self::I32(h) => h.input(0),
        };
        graph.connect(output, input);
    }
}

pub struct DataConversionGraph {
    graph: FlowGraph,
    source: SourceNode,
    sink: SinkNode,
    config: ConversionConfig,
    frame_position: i64,
}

impl DataConversionGraph {
    pub fn configure(config: &ConversionConfig) -> Result<Self> {
        if config.source_channels == 0 || config.sink_channels == 0 {
            return Err(FlowGraphError::InvalidChannelCount);
        }
        if config.source_rate == 0 || config.sink_rate == 0 {
            return Err(FlowGraphError::InvalidSampleRate {
                input: config.source_rate,
                output: config.sink_rate,
            });
        }
        if config.frames_per_block == 0 {
            return Err(FlowGraphError::InvalidBlockSize);
        }
        let expand = config.source_channels != config.sink_channels;
        if expand && config.source_channels != 1 {
            tracing::warn!(
                source_channels = config.source_channels,
                sink_channels = config.sink_channels,
                "unsupported channel conversion"
            );
            return Err(FlowGraphError::UnsupportedChannelConversion {
                source_channels: config.source_channels,
                sink_channels: config.sink_channels,
            });
        }

        let mut graph = FlowGraph::with_frames_per_block(config.frames_per_block);
        let source = SourceNode::add(&mut graph, config.source_format, config.source_channels);
        let mut last_output = source.output();

        let resample = config.source_rate != config.sink_rate;
        if resample {
            let resampler = MultiChannelResampler::make(
                config.source_channels,
                config.source_rate,
                config.sink_rate,
                config.quality,
            )?;
            let converter =
                graph.add(SampleRateConverter::new(config.source_channels, resampler));
            graph.connect(last_output, converter.input(0));
            last_output = converter.output(0);
        }

        if expand {
            let expander = graph.add(MonoToMultiConverter::new(config.sink_channels));
            graph.connect(last_output, expander.input(0));
            last_output = expander.output(0);
        }

        let sink = SinkNode::add(&mut graph, config.sink_format, config.sink_channels);
        sink.connect_from(&mut graph, last_output);

        tracing::debug!(
            source_format = ?config.source_format,
            sink_format = ?config.sink_format,
            source_channels = config.source_channels,
            sink_channels = config.sink_channels,
            source_rate = config.source_rate,
            sink_rate = config.sink_rate,
            resample,
            expand,
            nodes = graph.node_count(),
            "conversion graph built"
        );

        Ok(Self {
            graph,
            source,
            sink,
            config: config.clone(),
            frame_position: 0,
        })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Output frames requested so far.
    pub fn frame_position(&self) -> i64 {
        self.frame_position
    }

    /// Hand the pipeline its next chunk of input. Replaces anything not yet
    /// consumed.
    pub fn set_source(&mut self, data: SampleSlice<'_>) -> Result<()> {
        match (&self.source, data) {
            (SourceNode::F32(h), SampleSlice::F32(s)) => self.graph.node_mut(*h).set_data(s),
            (SourceNode::I16(h), SampleSlice::I16(s)) => self.graph.node_mut(*h).set_data(s),
            (SourceNode::I24(h), SampleSlice::I24(s)) => self.graph.node_mut(*h).set_data(s),
            (SourceNode::I32(h), SampleSlice::I32(s)) => self.graph.node_mut(*h).set_data(s),
            (_, data) => {
                return Err(FlowGraphError::FormatMismatch {
                    expected: self.config.source_format,
                    actual: data.format(),
                })
            }
        }
        Ok(())
    }

    /// Fill `out` with whole frames. Returns how many frames were written,
    /// fewer when the input ran out.
    pub fn read(&mut self, out: SampleSliceMut<'_>) -> Result<usize> {
        let num_frames = out.len() / self.config.sink_channels;
        let position = self.frame_position;
        let graph = &mut self.graph;
        let frames = match (&self.sink, out) {
            (SinkNode::F32(h), SampleSliceMut::F32(s)) => graph.read(*h, position, s, num_frames),
            (SinkNode::I16(h), SampleSliceMut::I16(s)) => graph.read(*h, position, s, num_frames),
            (SinkNode::I24(h), SampleSliceMut::I24(s)) => graph.read(*h, position, s, num_frames),
            (SinkNode::I32(h), SampleSliceMut::I32(s)) => graph.read(*h, position, s, num_frames),
            (_, out) => {
                return Err(FlowGraphError::FormatMismatch {
                    expected: self.config.sink_format,
                    actual: out.format(),
                })
            }
        };
        // Step past the whole request so a refilled source is pulled again.
        self.frame_position += num_frames as i64;
        Ok(frames)
    }

    /// Rewind every node so the pipeline behaves as freshly configured.
    pub fn reset(&mut self) {
        match self.sink {
            SinkNode::F32(h) => self.graph.reset(h),
            SinkNode::I16(h) => self.graph.reset(h),
            SinkNode::I24(h) => self.graph.reset(h),
            SinkNode::I32(h) => self.graph.reset(h),
        }
        self.frame_position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_i16_to_stereo_float() {
        let config = ConversionConfig {
            source_format: AudioFormat::I16,
            source_channels: 1,
            sink_channels: 2,
            ..Default::default()
        };
        let mut conversion = DataConversionGraph::configure(&config).unwrap();
        conversion
            .set_source(SampleSlice::I16(&[16384, -8192, 0]))
            .unwrap();

        let mut out = [9.0f32; 10];
        let frames = conversion.read(SampleSliceMut::F32(&mut out)).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(&out[..6], &[0.5, 0.5, -0.25, -0.25, 0.0, 0.0]);
        assert_eq!(conversion.frame_position(), 5);
    }

    #[test]
    fn test_rejects_downmix() {
        let config = ConversionConfig {
            source_channels: 2,
            sink_channels: 1,
            ..Default::default()
        };
        assert_eq!(
            DataConversionGraph::configure(&config).err(),
            Some(FlowGraphError::UnsupportedChannelConversion {
                source_channels: 2,
                sink_channels: 1
            })
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let zero_block = ConversionConfig {
            frames_per_block: 0,
            ..Default::default()
        };
        assert_eq!(
            DataConversionGraph::configure(&zero_block).err(),
            Some(FlowGraphError::InvalidBlockSize)
        );

        let zero_rate = ConversionConfig {
            sink_rate: 0,
            ..Default::default()
        };
        assert!(matches!(
            DataConversionGraph::configure(&zero_rate),
            Err(FlowGraphError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn test_format_mismatch_is_reported() {
        let mut conversion = DataConversionGraph::configure(&ConversionConfig::default()).unwrap();
        assert_eq!(
            conversion.set_source(SampleSlice::I32(&[0, 0])),
            Err(FlowGraphError::FormatMismatch {
                expected: AudioFormat::F32,
                actual: AudioFormat::I32
            })
        );
        let mut out = [0i16; 4];
        assert_eq!(
            conversion.read(SampleSliceMut::I16(&mut out)),
            Err(FlowGraphError::FormatMismatch {
                expected: AudioFormat::F32,
                actual: AudioFormat::I16
            })
        );
    }

    #[test]
    fn test_streaming_resample_across_chunks() {
        let config = ConversionConfig {
            source_channels: 1,
            sink_channels: 1,
            source_rate: 44_100,
            sink_rate: 48_000,
            ..Default::default()
        };
        let mut conversion = DataConversionGraph::configure(&config).unwrap();
        let chunk = [0.5f32; 441];
        let mut out = [0.0f32; 1024];
        let mut total = 0;
        for _ in 0..10 {
            conversion.set_source(SampleSlice::F32(&chunk)).unwrap();
            total += conversion.read(SampleSliceMut::F32(&mut out)).unwrap();
        }
        // 4410 input frames at 48000 / 44100.
        assert!((4790..=4800).contains(&total), "total {}", total);
        assert!(out[..8].iter().all(|&s| (s - 0.5).abs() < 1.0e-3));
    }

    #[test]
    fn test_reset_restarts_pipeline() {
        let mut conversion = DataConversionGraph::configure(&ConversionConfig {
            source_channels: 1,
            sink_channels: 1,
            ..Default::default()
        })
        .unwrap();
        let mut out = [0.0f32; 4];
        conversion.set_source(SampleSlice::F32(&[0.1, 0.2])).unwrap();
        assert_eq!(conversion.read(SampleSliceMut::F32(&mut out)).unwrap(), 2);
        conversion.reset();
        assert_eq!(conversion.frame_position(), 0);
        conversion.set_source(SampleSlice::F32(&[0.3])).unwrap();
        assert_eq!(conversion.read(SampleSliceMut::F32(&mut out)).unwrap(), 1);
        assert_eq!(out[0], 0.3);
    }
}
