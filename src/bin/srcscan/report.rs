use std::f64::consts::PI;

use flowgraph_dsp::MultiChannelResampler;
use rustfft::{num_complex::Complex, FftPlanner};

pub const RATES: &[u32] = &[
    8_000, 11_025, 22_050, 32_000, 44_100, 48_000, 64_000, 88_200, 96_000,
];

const NUM_OUTPUT_FRAMES: usize = 10_000;
const FRAMES_PER_CYCLE: f64 = 81.379;
const FFT_SIZE: usize = 4_096;
const HYSTERESIS: f32 = 0.25;

pub struct Measurement {
    source_rate: u32,
    sink_rate: u32,
    kind: &'static str,
    frames: usize,
    crossing_delta: i64,
    glitch_peak: f32,
    snr_db: f64,
}

impl Measurement {
    pub fn header() -> &'static str {
        "quality\tfrom\tto\tkind\tframes\txings\tglitch\tsnr_db"
    }

    pub fn run(resampler: &mut MultiChannelResampler, source_rate: u32, sink_rate: u32) -> Self {
        let input = sine(source_rate, sink_rate);
        let output = convert(resampler, &input);
        Self {
            source_rate,
            sink_rate,
            kind: resampler.kind(),
            frames: output.len(),
            crossing_delta: zero_crossings(&output) as i64 - zero_crossings(&input) as i64,
            glitch_peak: glitch_peak(&output),
            snr_db: snr_db(&output),
        }
    }

    pub fn row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{:+}\t{:.4}\t{:.1}",
            self.source_rate,
            self.sink_rate,
            self.kind,
            self.frames,
            self.crossing_delta,
            self.glitch_peak,
            self.snr_db
        )
    }
}

fn sine(source_rate: u32, sink_rate: u32) -> Vec<f32> {
    let num_input = NUM_OUTPUT_FRAMES * source_rate as usize / sink_rate as usize;
    let cycles_per_frame = sink_rate as f64 / (FRAMES_PER_CYCLE * source_rate as f64);
    (0..num_input)
        .map(|i| (2.0 * PI * cycles_per_frame * i as f64).sin() as f32)
        .collect()
}

fn convert(resampler: &mut MultiChannelResampler, input: &[f32]) -> Vec<f32> {
    let mut output = Vec::with_capacity(NUM_OUTPUT_FRAMES);
    let mut frame = [0.0f32];
    let mut samples = input.iter().peekable();
    while let Some(&&sample) = samples.peek() {
        if resampler.is_write_ready() {
            resampler.write_next_frame(&[sample]);
            samples.next();
        } else {
            resampler.read_next_frame(&mut frame);
            output.push(frame[0]);
        }
    }
    while resampler.is_read_ready() {
        resampler.read_next_frame(&mut frame);
        output.push(frame[0]);
    }
    output
}

fn zero_crossings(samples: &[f32]) -> usize {
    let mut count = 0;
    let mut state = 0i8;
    for &s in samples {
        if s >= HYSTERESIS {
            count += usize::from(state < 0);
            state = 1;
        } else if s <= -HYSTERESIS {
            count += usize::from(state > 0);
            state = -1;
        }
    }
    count
}

/// Largest second difference after the filter has settled.
fn glitch_peak(samples: &[f32]) -> f32 {
    samples
        .windows(3)
        .skip(10)
        .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
        .fold(0.0, f32::max)
}

/// Tone energy over everything else, Hann windowed, from the tail of the
/// output where priming is long over.
fn snr_db(samples: &[f32]) -> f64 {
    if samples.len() < FFT_SIZE {
        return f64::NAN;
    }
    let tail = &samples[samples.len() - FFT_SIZE..];
    let mut spectrum: Vec<Complex<f32>> = tail
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32;
            Complex::new(s * (0.5 - 0.5 * phase.cos()), 0.0)
        })
        .collect();
    FftPlanner::<f32>::new()
        .plan_fft_forward(FFT_SIZE)
        .process(&mut spectrum);

    let power: Vec<f64> = spectrum[1..FFT_SIZE / 2]
        .iter()
        .map(|c| c.norm_sqr() as f64)
        .collect();
    let Some(peak) = power
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
    else {
        return f64::NAN;
    };
    let band = peak.saturating_sub(8)..(peak + 9).min(power.len());
    let tone: f64 = power[band].iter().sum();
    let total: f64 = power.iter().sum();
    10.0 * (tone / (total - tone).max(f64::MIN_POSITIVE)).log10()
}
