//! Benchmarks for the ADSR envelope, one `calculate` per sample.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfx_synth::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

fn step(env: &mut Envelope, samples: usize, gate: bool) -> f32 {
    let mut acc = 0.0;
    for _ in 0..samples {
        env.calculate(black_box(440.0), gate);
        acc += env.amp();
    }
    acc
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase (ramping up), long enough not to finish
        let mut env = Envelope::adsr(u32::MAX, 100, 0.7, 1_000);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &size| {
            b.iter(|| black_box(step(&mut env, size, true)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(10, 10, 0.7, 1_000);
        step(&mut env, 100, true);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| black_box(step(&mut env, size, true)))
        });

        // Release phase, retriggered so it never runs out
        let mut env = Envelope::adsr(0, 0, 0.7, u32::MAX);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| {
                env.calculate(440.0, true);
                black_box(step(&mut env, size, false))
            })
        });
    }

    group.finish();
}
