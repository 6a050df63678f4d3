//! Real-world scenario benchmarks.
//!
//! These pull complete conversion graphs the way a stream callback would,
//! one device buffer at a time.

mod conversion;

pub use conversion::bench_conversion;
