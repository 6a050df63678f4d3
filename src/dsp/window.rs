use std::f64::consts::PI;

const HAMMING_ALPHA: f64 = 0.54;

/// `sin(x) / x`, with the removable singularity at zero filled in.
#[inline]
pub fn sinc(radians: f64) -> f64 {
    if radians.abs() < 1.0e-8 {
        return 1.0;
    }
    radians.sin() / radians
}

/// Hamming window spanning `[-spread * PI, spread * PI]`, 1.0 at the center.
#[inline]
pub fn hamming(radians: f64, spread: usize) -> f64 {
    let window_phase = radians / spread as f64;
    HAMMING_ALPHA + (1.0 - HAMMING_ALPHA) * window_phase.cos()
}

/// Windowed sinc evaluated at `offset` input frames from the filter center.
///
/// `cutoff_scaler` < 1 stretches the sinc, lowering the cutoff below the
/// input Nyquist rate. The window is left unscaled so the filter length does
/// not change.
#[inline]
pub fn windowed_sinc(offset: f64, spread: usize, cutoff_scaler: f64) -> f64 {
    let radians = offset * PI;
    sinc(cutoff_scaler * radians) * hamming(radians, spread)
}
