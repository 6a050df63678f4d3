//! Benchmarks for full data conversion graphs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgraph_dsp::io::{AudioFormat, SampleSlice, SampleSliceMut};
use flowgraph_dsp::{ConversionConfig, DataConversionGraph, Quality};

use crate::BLOCK_SIZES;

pub fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/conversion");

    // === PASSTHROUGH: format change only ===
    let passthrough = ConversionConfig {
        source_format: AudioFormat::I16,
        ..Default::default()
    };

    // === TYPICAL: 44.1k i16 stereo file into a 48k float device ===
    let typical = ConversionConfig {
        source_format: AudioFormat::I16,
        source_rate: 44_100,
        ..Default::default()
    };

    // === MONO VOICE: 16k mono into a 48k stereo device, best quality ===
    let voice = ConversionConfig {
        source_format: AudioFormat::I16,
        source_channels: 1,
        source_rate: 16_000,
        quality: Quality::Best,
        ..Default::default()
    };

    let cases = [("passthrough", passthrough), ("44k1_to_48k", typical), ("mono_16k_to_48k", voice)];

    for &size in BLOCK_SIZES {
        for (name, config) in &cases {
            let mut conversion = DataConversionGraph::configure(config).unwrap();
            let input: Vec<i16> = (0..size * 2 * config.source_channels)
                .map(|i| ((i as f32 * 0.05).sin() * 16_000.0) as i16)
                .collect();
            let mut output = vec![0.0f32; size * config.sink_channels];

            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    conversion.set_source(SampleSlice::I16(&input)).unwrap();
                    let frames = conversion
                        .read(SampleSliceMut::F32(black_box(&mut output)))
                        .unwrap();
                    black_box(frames);
                })
            });
        }
    }

    group.finish();
}
