//! Benchmark for a mixer rendering many looping voices to stereo.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use sfx_synth::{presets, synth::SoundBank, EngineConfig};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Roughly a busy game scene
const VOICES: usize = 16;

pub fn bench_mixer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mixer");

    for &size in BLOCK_SIZES {
        let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);
        let (mut bank, mut mixer) = SoundBank::new(config).unwrap();

        let patches = presets::all();
        for i in 0..VOICES {
            let patch = patches[i % patches.len()].clone().looping(true);
            let id = bank.load(i as u32, &patch).unwrap();
            let handle = bank.handle_mut(id).unwrap();
            handle.set_pan(i as f32 / VOICES as f32 * 2.0 - 1.0);
            handle.play().unwrap();
        }

        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| mixer.render_stereo(black_box(&mut left), black_box(&mut right)))
        });

        let mut interleaved = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("interleaved", size), &size, |b, _| {
            b.iter(|| mixer.render_interleaved(black_box(&mut interleaved), 2))
        });
    }

    group.finish();
}
