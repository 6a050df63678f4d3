use std::f32::consts::SQRT_2;

use super::node::{FlowNode, ProcessContext};
use super::port::PortLayout;

// Width of the knee above 1.0. With this width the quadratic
// `x - (x - 1)^2 / (2 * KNEE)` reaches sqrt(2) exactly where its slope hits 0.
const KNEE: f32 = 2.0 * (SQRT_2 - 1.0);

/// Soft limiter.
///
/// Untouched inside [-1, 1]. Above that a quadratic knee bends the curve
/// smoothly over to a flat ceiling at sqrt(2). NaN samples are replaced by
/// the previous output so they never reach the device.
pub struct Limiter {
    samples_per_frame: usize,
    last_valid_output: f32,
}

impl Limiter {
    pub fn new(samples_per_frame: usize) -> Self {
        Self {
            samples_per_frame,
            last_valid_output: 0.0,
        }
    }

    #[inline]
    fn limit(&mut self, input: f32) -> f32 {
        if input.is_nan() {
            return self.last_valid_output;
        }
        let magnitude = input.abs();
        let output = if magnitude <= 1.0 {
            input
        } else if magnitude < 1.0 + KNEE {
            let over = magnitude - 1.0;
            (magnitude - over * over / (2.0 * KNEE)).copysign(input)
        } else {
            SQRT_2.copysign(input)
        };
        self.last_valid_output = output;
        output
    }
}

impl FlowNode for Limiter {
    fn ports(&self) -> PortLayout {
        PortLayout::new()
            .input(self.samples_per_frame)
            .output(self.samples_per_frame)
    }

    fn process(&mut self, ctx: &mut ProcessContext<'_>, num_frames: usize) -> usize {
        let len = num_frames * self.samples_per_frame;
        let (input, output) = ctx.io(0, 0);
        for (out, &sample) in output[..len].iter_mut().zip(&input[..len]) {
            *out = self.limit(sample);
        }
        num_frames
    }

    fn reset(&mut self) {
        self.last_valid_output = 0.0;
    }

    fn name(&self) -> &'static str {
        "limiter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knee_is_continuous() {
        let mut limiter = Limiter::new(1);
        let below = limiter.limit(1.0);
        let above = limiter.limit(1.0 + 1.0e-4);
        assert!((above - below).abs() < 2.0e-4);

        let top = limiter.limit(1.0 + KNEE - 1.0e-4);
        assert!((top - SQRT_2).abs() < 1.0e-4, "top of knee {}", top);
        assert_eq!(limiter.limit(5.0), SQRT_2);
        assert_eq!(limiter.limit(-5.0), -SQRT_2);
    }
}
