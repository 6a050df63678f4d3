//! Low-level DSP primitives used by the resamplers.
//!
//! These components are allocation-free once constructed, making them safe to
//! embed directly inside nodes that run on an audio callback. They stay focused
//! on the signal-processing math so the resampler family can layer phase
//! tracking and variant selection on top.

/// Mirrored frame history that keeps the newest frames contiguous.
pub mod history;
/// Reduction of sample rate pairs to their smallest integer ratio.
pub mod ratio;
/// Sinc and Hamming window functions.
pub mod window;

pub use history::FrameHistory;
pub use ratio::IntegerRatio;
