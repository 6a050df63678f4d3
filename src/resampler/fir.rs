//! FIR kernels shared by the polyphase and sinc resamplers.
//!
//! `window` is a [`crate::dsp::FrameHistory`] window: `num_taps` interleaved
//! frames, newest first. Mono and stereo get their own loops so the compiler
//! can keep the accumulators in registers.

/// Multiply the history window by one coefficient row, writing one frame.
#[inline]
pub fn convolve(window: &[f32], coefficients: &[f32], frame: &mut [f32]) {
    match frame.len() {
        1 => frame[0] = convolve_mono(window, coefficients),
        2 => {
            let (left, right) = convolve_stereo(window, coefficients);
            frame[0] = left;
            frame[1] = right;
        }
        _ => convolve_multi(window, coefficients, frame),
    }
}

#[inline]
fn convolve_mono(window: &[f32], coefficients: &[f32]) -> f32 {
    let mut acc = [0.0f32; 4];
    let mut xs = window.chunks_exact(4);
    let mut cs = coefficients.chunks_exact(4);
    for (x, c) in (&mut xs).zip(&mut cs) {
        acc[0] += x[0] * c[0];
        acc[1] += x[1] * c[1];
        acc[2] += x[2] * c[2];
        acc[3] += x[3] * c[3];
    }
    let tail: f32 = xs
        .remainder()
        .iter()
        .zip(cs.remainder())
        .map(|(x, c)| x * c)
        .sum();
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

#[inline]
fn convolve_stereo(window: &[f32], coefficients: &[f32]) -> (f32, f32) {
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    for (x, &c) in window.chunks_exact(2).zip(coefficients) {
        left += x[0] * c;
        right += x[1] * c;
    }
    (left, right)
}

#[inline]
fn convolve_multi(window: &[f32], coefficients: &[f32], frame: &mut [f32]) {
    let channels = frame.len();
    frame.fill(0.0);
    for (x, &c) in window.chunks_exact(channels).zip(coefficients) {
        for (acc, &sample) in frame.iter_mut().zip(x) {
            *acc += sample * c;
        }
    }
}
