//! Benchmarks for the wavetable oscillator in each modulation mode.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfx_synth::dsp::{
    lfo::Lfo, Envelope, Modulation, SynthParams, WaveTable, Waveform,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut lfo_buffer = vec![0.0f32; size];
        Lfo::new(SAMPLE_RATE, Waveform::Sine, 5.0)
            .unwrap()
            .render(&mut lfo_buffer);

        // Baseline: no envelope, no modulation
        let mut osc = WaveTable::new(SAMPLE_RATE, &Waveform::Saw).unwrap();
        let params = SynthParams::tone(440.0, 1.0);
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| osc.synth_samples(black_box(&mut buffer), black_box(&params), None, true))
        });

        // Per-sample envelope evaluation
        let mut osc = WaveTable::new(SAMPLE_RATE, &Waveform::Saw)
            .unwrap()
            .with_envelope(Envelope::adsr(100, 100, 0.8, 100));
        group.bench_with_input(BenchmarkId::new("envelope", size), &size, |b, _| {
            b.iter(|| osc.synth_samples(black_box(&mut buffer), black_box(&params), None, true))
        });

        for (name, modulation, arg) in [
            ("am", Modulation::Am, 0.3),
            ("fm", Modulation::Fm, 50.0),
            ("pm", Modulation::Pm, 0.0),
            ("dm", Modulation::Dm, 0.0),
        ] {
            let mut osc = WaveTable::new(SAMPLE_RATE, &Waveform::Square).unwrap();
            let params = SynthParams::tone(440.0, 1.0).with_modulation(modulation, arg);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.synth_samples(
                        black_box(&mut buffer),
                        black_box(&params),
                        Some(&lfo_buffer),
                        true,
                    )
                })
            });
        }

        // Silence fast path
        let mut osc = WaveTable::new(SAMPLE_RATE, &Waveform::Sine).unwrap();
        let silent = SynthParams::tone(0.0, 1.0);
        group.bench_with_input(BenchmarkId::new("silent", size), &size, |b, _| {
            b.iter(|| osc.synth_samples(black_box(&mut buffer), black_box(&silent), None, true))
        });
    }

    group.finish();
}
