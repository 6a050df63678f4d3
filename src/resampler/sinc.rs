use super::coefficients::sinc_table;
use super::fir::convolve;
use super::phase::ContinuousPhase;
use super::MAX_COEFFICIENTS;
use crate::dsp::FrameHistory;

/// Windowed-sinc resampler for ratios with no small exact form.
///
/// The phase is continuous. The table samples `[0, 1]` at `num_series`
/// points and each output blends the two rows around its phase.
pub struct SincResampler {
    phase: ContinuousPhase,
    history: FrameHistory,
    coefficients: Vec<f32>,
    num_taps: usize,
    num_series: usize,
    scratch: Vec<f32>,
}

impl SincResampler {
    pub fn new(
        channel_count: usize,
        input_rate: u32,
        output_rate: u32,
        num_taps: usize,
        cutoff_scaler: f64,
    ) -> Self {
        let num_series = MAX_COEFFICIENTS / num_taps;
        Self {
            phase: ContinuousPhase::new(input_rate, output_rate),
            history: FrameHistory::new(num_taps, channel_count),
            coefficients: sinc_table(num_taps, num_series, cutoff_scaler),
            num_taps,
            num_series,
            scratch: vec![0.0; channel_count],
        }
    }

    pub fn phase(&self) -> &ContinuousPhase {
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

    pub fn read_frame(&mut self, frame: &mut [f32]) {
        let table_phase = self.phase.fraction() * self.num_series as f64;
        // The guard row catches phases that round up to exactly 1.0.
        let index = (table_phase as usize).min(self.num_series - 1);
        let fraction = (table_phase - index as f64) as f32;

        let taps = self.num_taps;
        let low = &self.coefficients[index * taps..(index + 1) * taps];
        let high = &self.coefficients[(index + 1) * taps..(index + 2) * taps];
        let window = self.history.window();

        convolve(window, low, frame);
        convolve(window, high, &mut self.scratch);
        for (out, &upper) in frame.iter_mut().zip(&self.scratch) {
            *out += fraction * (upper - *out);
        }
    }

    pub fn advance_write(&mut self) {
        self.phase.advance_write();
    }

    pub fn advance_read(&mut self) {
        self.phase.advance_read();
    }

    pub fn reset(&mut self) {
        self.phase.reset();
        self.history.reset();
    }
}
