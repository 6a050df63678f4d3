use super::coefficients::polyphase_table;
use super::fir::convolve;
use super::phase::RationalPhase;
use crate::dsp::{FrameHistory, IntegerRatio};

/// Rational polyphase FIR.
///
/// Every output lands on one of `denominator` exact phases, so the whole
/// filter bank is tabulated up front and each output costs one convolution.
pub struct PolyphaseResampler {
    phase: RationalPhase,
    history: FrameHistory,
    coefficients: Vec<f32>,
    num_taps: usize,
    // Row of the next output, always `output_index % denominator`.
    coefficient_cursor: usize,
}

impl PolyphaseResampler {
    pub fn new(
        channel_count: usize,
        ratio: IntegerRatio,
        num_taps: usize,
        cutoff_scaler: f64,
    ) -> Self {
        let coefficients = polyphase_table(
            num_taps,
            ratio.numerator() as u64,
            ratio.denominator() as u64,
            cutoff_scaler,
        );
        Self {
            phase: RationalPhase::new(ratio),
            history: FrameHistory::new(num_taps, channel_count),
            coefficients,
            num_taps,
            coefficient_cursor: 0,
        }
    }

    pub fn phase(&self) -> &RationalPhase {
        &self.phase
    }

    pub fn num_taps(&self) -> usize {
        self.num_taps
    }

    pub fn table_len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn write_frame(&mut self, frame: &[f32]) {
        self.history.push(frame);
    }

    pub fn read_frame(&self, frame: &mut [f32]) {
        let start = self.coefficient_cursor * self.num_taps;
        let row = &self.coefficients[start..start + self.num_taps];
        convolve(self.history.window(), row, frame);
    }

    pub fn advance_write(&mut self) {
        self.phase.advance_write();
    }

    pub fn advance_read(&mut self) {
        self.phase.advance_read();
        self.coefficient_cursor += 1;
        if self.coefficient_cursor == self.phase.denominator() as usize {
            self.coefficient_cursor = 0;
        }
    }

    pub fn reset(&mut self) {
        self.phase.reset();
        self.history.reset();
        self.coefficient_cursor = 0;
    }
}
