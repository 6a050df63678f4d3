use crate::dsp::IntegerRatio;

/// Exact phase tracking for a reduced `input / output` ratio.
///
/// The phase counts in units of `1 / denominator` input frames. Reading an
/// output frame moves it forward by `numerator`; once it reaches
/// `denominator` the next input frame has to be written, which moves it back
/// by `denominator`. No rounding error can accumulate.
#[derive(Debug, Clone, Copy)]
pub struct RationalPhase {
    integer_phase: i64,
    numerator: i64,
    denominator: i64,
}

impl RationalPhase {
    pub fn new(ratio: IntegerRatio) -> Self {
        let denominator = ratio.denominator() as i64;
        Self {
            // Start hungry so the first operation is a write.
            integer_phase: denominator,
            numerator: ratio.numerator() as i64,
            denominator,
        }
    }

    #[inline]
    pub fn is_write_ready(&self) -> bool {
        self.integer_phase >= self.denominator
    }

    #[inline]
    pub fn advance_write(&mut self) {
        self.integer_phase -= self.denominator;
    }

    #[inline]
    pub fn advance_read(&mut self) {
        self.integer_phase += self.numerator;
    }

    /// Position of the next output between the two newest inputs, in `[0, 1)`
    /// while a read is pending.
    #[inline]
    pub fn fraction(&self) -> f32 {
        self.integer_phase as f32 / self.denominator as f32
    }

    pub fn integer_phase(&self) -> i64 {
        self.integer_phase
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn reset(&mut self) {
        self.integer_phase = self.denominator;
    }
}

/// Double precision phase for ratios whose reduced denominator is too large
/// to tabulate.
#[derive(Debug, Clone, Copy)]
pub struct ContinuousPhase {
    phase: f64,
    increment: f64,
}

impl ContinuousPhase {
    pub fn new(input_rate: u32, output_rate: u32) -> Self {
        Self {
            phase: 1.0,
            increment: input_rate as f64 / output_rate as f64,
        }
    }

    #[inline]
    pub fn is_write_ready(&self) -> bool {
        self.phase >= 1.0
    }

    #[inline]
    pub fn advance_write(&mut self) {
        self.phase -= 1.0;
    }

    #[inline]
    pub fn advance_read(&mut self) {
        self.phase += self.increment;
    }

    #[inline]
    pub fn fraction(&self) -> f64 {
        self.phase
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn reset(&mut self) {
        self.phase = 1.0;
    }
}
