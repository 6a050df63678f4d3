//! Benchmarks for resampler internals.

mod resampler;

pub use resampler::{bench_convolve, bench_resampler};
