//! Windowed-sinc coefficient tables.
//!
//! Every row holds `num_taps` coefficients for one fractional phase, ordered
//! the way [`super::fir::convolve`] walks the history window (newest frame
//! first). Rows are normalized to a DC gain of exactly 1.0 so the output level
//! does not ripple as the resampler steps through its phases.

use crate::dsp::window::windowed_sinc;

/// Scale applied to the sinc argument so the passband ends below the output
/// Nyquist rate. Only ever tightens the filter, never widens it.
pub fn cutoff_scaler(normalized_cutoff: f32, input_rate: u32, output_rate: u32) -> f64 {
    (normalized_cutoff as f64 * output_rate as f64 / input_rate as f64).min(1.0)
}

/// Fill one row for an output landing `phase` input frames past the newest
/// filter center, then normalize its gain.
pub fn fill_row(row: &mut [f32], phase: f64, cutoff_scaler: f64) {
    let num_taps = row.len();
    debug_assert!(num_taps % 2 == 0);
    let spread = num_taps / 2;

    let mut gain = 0.0f64;
    for (tap, coefficient) in row.iter_mut().enumerate() {
        let tap_phase = phase - spread as f64 + tap as f64;
        let value = windowed_sinc(tap_phase, spread, cutoff_scaler);
        *coefficient = value as f32;
        gain += value;
    }

    let correction = 1.0 / gain;
    for coefficient in row.iter_mut() {
        *coefficient = (*coefficient as f64 * correction) as f32;
    }
}

/// One row per output phase of a reduced `numerator / denominator` ratio, in
/// the order the rows are consumed: row `i` serves output frame `i` modulo
/// `denominator`.
pub fn polyphase_table(
    num_taps: usize,
    numerator: u64,
    denominator: u64,
    cutoff_scaler: f64,
) -> Vec<f32> {
    let mut table = vec![0.0f32; num_taps * denominator as usize];
    for (i, row) in table.chunks_exact_mut(num_taps).enumerate() {
        // Exact integer phase avoids drift across thousands of rows.
        let integer_phase = (i as u64 * numerator) % denominator;
        let phase = integer_phase as f64 / denominator as f64;
        fill_row(row, phase, cutoff_scaler);
    }
    table
}

/// `num_series` evenly spaced phases over `[0, 1)` plus a guard row at 1.0 so
/// interpolation between row `k` and `k + 1` never runs off the end.
pub fn sinc_table(num_taps: usize, num_series: usize, cutoff_scaler: f64) -> Vec<f32> {
    let mut table = vec![0.0f32; num_taps * (num_series + 1)];
    for (i, row) in table.chunks_exact_mut(num_taps).enumerate() {
        let phase = i as f64 / num_series as f64;
        fill_row(row, phase, cutoff_scaler);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_gain(row: &[f32]) -> f32 {
        row.iter().sum()
    }

    #[test]
    fn test_every_polyphase_row_has_unit_gain() {
        let table = polyphase_table(16, 147, 160, 1.0);
        assert_eq!(table.len(), 16 * 160);
        for row in table.chunks_exact(16) {
            assert!((row_gain(row) - 1.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn test_downsampling_rows_have_unit_gain() {
        let scaler = cutoff_scaler(0.7, 48_000, 8_000);
        assert!(scaler < 0.2);
        let table = polyphase_table(32, 6, 1, scaler);
        assert!((row_gain(&table) - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn test_zero_phase_row_is_an_impulse() {
        // At integer positions the unscaled sinc is zero except at the center.
        let table = polyphase_table(8, 1, 2, 1.0);
        let row = &table[..8];
        for (tap, &c) in row.iter().enumerate() {
            let expected = if tap == 4 { 1.0 } else { 0.0 };
            assert!((c - expected).abs() < 1.0e-6, "tap {} = {}", tap, c);
        }
    }

    #[test]
    fn test_sinc_table_guard_row_matches_shifted_first_row() {
        // Phase 1.0 is phase 0.0 moved one frame toward the newest input.
        let table = sinc_table(8, 64, 1.0);
        let first = &table[..8];
        let guard = &table[64 * 8..65 * 8];
        for tap in 0..7 {
            assert!((guard[tap] - first[tap + 1]).abs() < 1.0e-5);
        }
    }

    #[test]
    fn test_cutoff_only_tightens() {
        assert_eq!(cutoff_scaler(1.0, 44_100, 48_000), 1.0);
        assert_eq!(cutoff_scaler(0.7, 8_000, 48_000), 1.0);
        assert!((cutoff_scaler(0.7, 48_000, 24_000) - 0.35).abs() < 1.0e-6);
    }
}
