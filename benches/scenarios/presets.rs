//! Benchmarks for each preset voice, looped so it keeps sounding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfx_synth::presets;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/presets");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for patch in presets::all() {
            let name = patch.name.clone();
            let (mut voice, mut handle) = patch.looping(true).build(SAMPLE_RATE, 8).unwrap();
            handle.play().unwrap();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| voice.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
