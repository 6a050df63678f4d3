//! Benchmarks for each resampler variant and the raw FIR kernel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgraph_dsp::resampler::fir::convolve;
use flowgraph_dsp::{MultiChannelResampler, Quality};

use crate::BLOCK_SIZES;

/// Fill `output`, feeding looped input whenever the resampler asks for it.
fn render(resampler: &mut MultiChannelResampler, input: &[f32], output: &mut [f32], channels: usize) {
    let mut cursor = 0;
    for frame in output.chunks_exact_mut(channels) {
        while resampler.is_write_ready() {
            resampler.write_next_frame(&input[cursor..cursor + channels]);
            cursor = (cursor + channels) % input.len();
        }
        resampler.read_next_frame(frame);
    }
}

pub fn bench_resampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/resampler");

    // 44.1k -> 48k tabulates exactly, 44.1k -> 48.001k forces the sinc table.
    let cases = [
        ("linear", 44_100, 48_000, Quality::Fastest),
        ("polyphase_16", 44_100, 48_000, Quality::Medium),
        ("polyphase_32", 44_100, 48_000, Quality::Best),
        ("sinc_16", 44_100, 48_001, Quality::Medium),
        ("sinc_32", 44_100, 48_001, Quality::Best),
        ("down_polyphase_16", 48_000, 44_100, Quality::Medium),
    ];

    for &size in BLOCK_SIZES {
        let channels = 2;
        let input: Vec<f32> = (0..1024 * channels)
            .map(|i| (i as f32 * 0.013).sin())
            .collect();
        let mut output = vec![0.0f32; size * channels];

        for &(name, from, to, quality) in &cases {
            let mut resampler = MultiChannelResampler::make(channels, from, to, quality).unwrap();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    render(
                        black_box(&mut resampler),
                        black_box(&input),
                        black_box(&mut output),
                        channels,
                    );
                })
            });
        }
    }

    group.finish();
}

pub fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolve");

    for channels in [1usize, 2, 6] {
        for taps in [16usize, 32] {
            let window: Vec<f32> = (0..taps * channels).map(|i| i as f32 * 0.01).collect();
            let coefficients: Vec<f32> = (0..taps).map(|i| 1.0 / (i + 1) as f32).collect();
            let mut frame = vec![0.0f32; channels];
            let id = format!("{}ch", channels);
            group.bench_with_input(BenchmarkId::new(id, taps), &taps, |b, _| {
                b.iter(|| {
                    convolve(
                        black_box(&window),
                        black_box(&coefficients),
                        black_box(&mut frame),
                    );
                })
            });
        }
    }

    group.finish();
}
