/*
Multi-Channel Resampler
=======================

Converts interleaved frames from one sample rate to another. The caller
drives it with two questions:

    loop {
        if resampler.is_write_ready() {
            resampler.write_next_frame(&input[i]);   // needs more input
        } else {
            resampler.read_next_frame(&mut output);  // an output is ready
        }
    }

Three implementations sit behind the enum:

  Linear     2 taps, interpolate the two newest frames.
  Polyphase  exact rational phase, one tabulated FIR row per output phase.
             Used when taps * reduced denominator fits in MAX_COEFFICIENTS.
  Sinc       continuous phase, table sampled over [0, 1] and interpolated.
             Used for awkward ratios such as 44100 -> 48001.

The first num_taps / 2 outputs come out of a history still full of zeros.
After the input runs dry, keep calling read_next_frame while
is_read_ready() to flush what the filter still holds.
*/

pub mod coefficients;
pub mod fir;
pub mod linear;
pub mod phase;
pub mod polyphase;
pub mod sinc;

use crate::dsp::IntegerRatio;
use crate::error::{FlowGraphError, Result};
use linear::LinearResampler;
use polyphase::PolyphaseResampler;
use sinc::SincResampler;

/// Upper bound on the size of any coefficient table, in floats.
pub const MAX_COEFFICIENTS: usize = 8 * 1024;

/// Cutoff, relative to the output Nyquist rate, that `make` uses when
/// downsampling.
pub const DEFAULT_NORMALIZED_CUTOFF: f32 = 0.70;

/// Trade between CPU and stopband rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quality {
    /// Linear interpolation.
    Fastest,
    Low,
    #[default]
    Medium,
    High,
    Best,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Fastest,
        Quality::Low,
        Quality::Medium,
        Quality::High,
        Quality::Best,
    ];

    pub fn num_taps(self) -> usize {
        match self {
            Quality::Fastest => 2,
            Quality::Low => 8,
            Quality::Medium => 16,
            Quality::High => 24,
            Quality::Best => 32,
        }
    }
}

pub enum MultiChannelResampler {
    Linear(LinearResampler),
    Polyphase(PolyphaseResampler),
    Sinc(SincResampler),
}

impl MultiChannelResampler {
    /// Pick the best implementation for a rate pair at the given quality.
    ///
    /// The cutoff is pulled below the output Nyquist rate only when
    /// downsampling.
    pub fn make(
        channel_count: usize,
        input_rate: u32,
        output_rate: u32,
        quality: Quality,
    ) -> Result<Self> {
        let mut builder = Self::builder()
            .channel_count(channel_count)
            .input_rate(input_rate)
            .output_rate(output_rate)
            .num_taps(quality.num_taps());
        if output_rate < input_rate {
            builder = builder.normalized_cutoff(DEFAULT_NORMALIZED_CUTOFF);
        }
        builder.build()
    }

    pub fn builder() -> ResamplerBuilder {
        ResamplerBuilder::default()
    }

    /// True when another input frame is needed before the next output.
    #[inline]
    pub fn is_write_ready(&self) -> bool {
        match self {
            Self::Linear(r) => r.phase().is_write_ready(),
            Self::Polyphase(r) => r.phase().is_write_ready(),
            Self::Sinc(r) => r.phase().is_write_ready(),
        }
    }

    #[inline]
    pub fn is_read_ready(&self) -> bool {
        !self.is_write_ready()
    }

    /// Push one interleaved frame into the filter history without moving
    /// the phase.
    #[inline]
    pub fn write_frame(&mut self, frame: &[f32]) {
        match self {
            Self::Linear(r) => r.write_frame(frame),
            Self::Polyphase(r) => r.write_frame(frame),
            Self::Sinc(r) => r.write_frame(frame),
        }
    }

    /// Compute the output frame for the current phase. Calling it twice
    /// without advancing yields the same frame.
    #[inline]
    pub fn read_frame(&mut self, frame: &mut [f32]) {
        match self {
            Self::Linear(r) => r.read_frame(frame),
            Self::Polyphase(r) => r.read_frame(frame),
            Self::Sinc(r) => r.read_frame(frame),
        }
    }

    #[inline]
    pub fn advance_write(&mut self) {
        match self {
            Self::Linear(r) => r.phase_mut().advance_write(),
            Self::Polyphase(r) => r.advance_write(),
            Self::Sinc(r) => r.advance_write(),
        }
    }

    #[inline]
    pub fn advance_read(&mut self) {
        match self {
            Self::Linear(r) => r.phase_mut().advance_read(),
            Self::Polyphase(r) => r.advance_read(),
            Self::Sinc(r) => r.advance_read(),
        }
    }

    #[inline]
    pub fn write_next_frame(&mut self, frame: &[f32]) {
        self.advance_write();
        self.write_frame(frame);
    }

    #[inline]
    pub fn read_next_frame(&mut self, frame: &mut [f32]) {
        self.read_frame(frame);
        self.advance_read();
    }

    /// Clear history and phase, as if freshly built.
    pub fn reset(&mut self) {
        match self {
            Self::Linear(r) => r.reset(),
            Self::Polyphase(r) => r.reset(),
            Self::Sinc(r) => r.reset(),
        }
    }

    pub fn num_taps(&self) -> usize {
        match self {
            Self::Linear(_) => 2,
            Self::Polyphase(r) => r.num_taps(),
            Self::Sinc(r) => r.num_taps(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Polyphase(_) => "polyphase",
            Self::Sinc(_) => "sinc",
        }
    }
}

/// Explicit construction with validation. Defaults: stereo, 48 kHz in and
/// out, 16 taps, normalized cutoff 1.0.
#[derive(Debug, Clone)]
pub struct ResamplerBuilder {
    channel_count: usize,
    input_rate: u32,
    output_rate: u32,
    num_taps: usize,
    normalized_cutoff: f32,
}

impl Default for ResamplerBuilder {
    fn default() -> Self {
        Self {
            channel_count: 2,
            input_rate: 48_000,
            output_rate: 48_000,
            num_taps: Quality::Medium.num_taps(),
            normalized_cutoff: 1.0,
        }
    }
}

impl ResamplerBuilder {
    pub fn channel_count(mut self, channel_count: usize) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn input_rate(mut self, rate: u32) -> Self {
        self.input_rate = rate;
        self
    }

    pub fn output_rate(mut self, rate: u32) -> Self {
        self.output_rate = rate;
        self
    }

    pub fn num_taps(mut self, num_taps: usize) -> Self {
        self.num_taps = num_taps;
        self
    }

    /// Fraction of the output Nyquist rate where the passband ends. Only
    /// has an effect when downsampling.
    pub fn normalized_cutoff(mut self, cutoff: f32) -> Self {
        self.normalized_cutoff = cutoff;
        self
    }

    pub fn build(self) -> Result<MultiChannelResampler> {
        if self.channel_count == 0 {
            return Err(FlowGraphError::InvalidChannelCount);
        }
        if self.input_rate == 0 || self.output_rate == 0 {
            return Err(FlowGraphError::InvalidSampleRate {
                input: self.input_rate,
                output: self.output_rate,
            });
        }
        let taps = self.num_taps;
        let taps_ok = taps == 2 || (taps > 0 && taps % 4 == 0 && taps * 2 <= MAX_COEFFICIENTS);
        if !taps_ok {
            return Err(FlowGraphError::InvalidTapCount(taps));
        }
        if !(self.normalized_cutoff > 0.0 && self.normalized_cutoff <= 1.0) {
            return Err(FlowGraphError::InvalidCutoff(self.normalized_cutoff));
        }

        let ratio = IntegerRatio::new(self.input_rate, self.output_rate).reduced();
        let scaler = coefficients::cutoff_scaler(
            self.normalized_cutoff,
            self.input_rate,
            self.output_rate,
        );

        let resampler = if taps == 2 {
            MultiChannelResampler::Linear(LinearResampler::new(self.channel_count, ratio))
        } else if taps * ratio.denominator() as usize <= MAX_COEFFICIENTS {
            MultiChannelResampler::Polyphase(PolyphaseResampler::new(
                self.channel_count,
                ratio,
                taps,
                scaler,
            ))
        } else {
            MultiChannelResampler::Sinc(SincResampler::new(
                self.channel_count,
                self.input_rate,
                self.output_rate,
                taps,
                scaler,
            ))
        };

        tracing::debug!(
            kind = resampler.kind(),
            taps,
            channels = self.channel_count,
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            numerator = ratio.numerator(),
            denominator = ratio.denominator(),
            cutoff_scaler = scaler,
            "resampler created"
        );
        Ok(resampler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_constant(resampler: &mut MultiChannelResampler, channels: usize, value: f32) -> Vec<f32> {
        let input = vec![value; channels];
        let mut frame = vec![0.0; channels];
        let mut output = Vec::new();
        for _ in 0..400 {
            if resampler.is_write_ready() {
                resampler.write_next_frame(&input);
            } else {
                resampler.read_next_frame(&mut frame);
                output.extend_from_slice(&frame);
            }
        }
        output
    }

    #[test]
    fn test_selection_by_table_size() {
        let r = MultiChannelResampler::make(2, 44_100, 48_000, Quality::Medium).unwrap();
        assert_eq!(r.kind(), "polyphase");

        let r = MultiChannelResampler::make(2, 44_100, 48_001, Quality::Medium).unwrap();
        assert_eq!(r.kind(), "sinc");

        let r = MultiChannelResampler::make(2, 44_100, 48_000, Quality::Fastest).unwrap();
        assert_eq!(r.kind(), "linear");

        // 441 rows of 32 taps no longer fit.
        let r = MultiChannelResampler::make(1, 8_000, 11_025, Quality::Best).unwrap();
        assert_eq!(r.kind(), "sinc");
        assert_eq!(r.num_taps(), 32);
    }

    #[test]
    fn test_builder_rejects_bad_parameters() {
        let b = MultiChannelResampler::builder;
        assert_eq!(
            b().channel_count(0).build().err(),
            Some(FlowGraphError::InvalidChannelCount)
        );
        assert_eq!(
            b().input_rate(0).build().err(),
            Some(FlowGraphError::InvalidSampleRate {
                input: 0,
                output: 48_000
            })
        );
        assert_eq!(b().num_taps(6).build().err(), Some(FlowGraphError::InvalidTapCount(6)));
        assert_eq!(b().num_taps(0).build().err(), Some(FlowGraphError::InvalidTapCount(0)));
        assert_eq!(
            b().normalized_cutoff(1.5).build().err(),
            Some(FlowGraphError::InvalidCutoff(1.5))
        );
        assert!(b().num_taps(12).build().is_ok());
    }

    #[test]
    fn test_dc_gain_is_unity_for_every_quality() {
        let pairs = [(44_100, 48_000), (48_000, 44_100), (48_000, 8_000), (11_025, 48_001)];
        for quality in Quality::ALL {
            for &(input_rate, output_rate) in &pairs {
                let mut r =
                    MultiChannelResampler::make(2, input_rate, output_rate, quality).unwrap();
                let output = run_constant(&mut r, 2, 0.25);
                // Outputs produced before the history has filled up.
                let priming = (r.num_taps() as f64 * output_rate as f64 / input_rate as f64)
                    .ceil() as usize
                    + 2;
                let settled = &output[2 * priming..];
                assert!(!settled.is_empty());
                for &sample in settled {
                    assert!(
                        (sample - 0.25).abs() < 1.0e-4,
                        "{:?} {} -> {}: {}",
                        quality,
                        input_rate,
                        output_rate,
                        sample
                    );
                }
            }
        }
    }

    #[test]
    fn test_read_frame_does_not_advance() {
        let mut r = MultiChannelResampler::make(1, 44_100, 48_001, Quality::High).unwrap();
        for i in 0..40 {
            if r.is_write_ready() {
                r.write_next_frame(&[(i as f32 * 0.3).sin()]);
            } else {
                r.advance_read();
            }
        }
        while r.is_write_ready() {
            r.write_next_frame(&[0.1]);
        }
        let mut a = [0.0];
        let mut b = [0.0];
        r.read_frame(&mut a);
        r.read_frame(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_restarts_hungry() {
        let mut r = MultiChannelResampler::make(1, 48_000, 44_100, Quality::Low).unwrap();
        let first = run_constant(&mut r, 1, 1.0);
        r.reset();
        assert!(r.is_write_ready());
        let second = run_constant(&mut r, 1, 1.0);
        assert_eq!(first, second);
    }
}
