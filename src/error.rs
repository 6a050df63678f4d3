use crate::io::AudioFormat;

/// Setup-time failures.
///
/// Nothing on the processing path returns these: running out of input is
/// reported as a short frame count, and malformed graphs (mismatched port
/// widths, bogus disconnects) are programmer errors that panic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowGraphError {
    #[error("channel count must be at least 1")]
    InvalidChannelCount,

    #[error("sample rates must be non-zero (input {input}, output {output})")]
    InvalidSampleRate { input: u32, output: u32 },

    #[error("tap count {0} is not supported, use 2 or a positive multiple of 4")]
    InvalidTapCount(usize),

    #[error("normalized cutoff {0} is outside (0, 1]")]
    InvalidCutoff(f32),

    #[error("frames per block must be at least 1")]
    InvalidBlockSize,

    #[error("cannot convert {source_channels} channels to {sink_channels} channels")]
    UnsupportedChannelConversion {
        source_channels: usize,
        sink_channels: usize,
    },

    #[error("buffer holds {actual:?} samples but the pipeline expects {expected:?}")]
    FormatMismatch {
        expected: AudioFormat,
        actual: AudioFormat,
    },
}

pub type Result<T> = std::result::Result<T, FlowGraphError>;
