use super::phase::RationalPhase;
use crate::dsp::IntegerRatio;

/// Two-point interpolation between the previous and current input frame.
///
/// No anti-aliasing at all. Only worth it when CPU matters more than the
/// images it leaves behind.
pub struct LinearResampler {
    phase: RationalPhase,
    previous: Vec<f32>,
    current: Vec<f32>,
}

impl LinearResampler {
    pub fn new(channel_count: usize, ratio: IntegerRatio) -> Self {
        Self {
            phase: RationalPhase::new(ratio),
            previous: vec![0.0; channel_count],
            current: vec![0.0; channel_count],
        }
    }

    pub fn phase(&self) -> &RationalPhase {
        &self.phase
    }

    pub fn phase_mut(&mut self) -> &mut RationalPhase {
        &mut self.phase
    }

    pub fn write_frame(&mut self, frame: &[f32]) {
        std::mem::swap(&mut self.previous, &mut self.current);
        let channels = self.current.len();
        self.current.copy_from_slice(&frame[..channels]);
    }

    pub fn read_frame(&self, frame: &mut [f32]) {
        let fraction = self.phase.fraction();
        for ((out, &p), &c) in frame.iter_mut().zip(&self.previous).zip(&self.current) {
            *out = p + fraction * (c - p);
        }
    }

    pub fn reset(&mut self) {
        self.phase.reset();
        self.previous.fill(0.0);
        self.current.fill(0.0);
    }
}
