use rustfft::{num_complex::Complex, FftPlanner};
use sfx_synth::{
    dsp::{Modulation, Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
    presets,
    synth::{Mixer, SoundBank},
    EngineConfig, Error,
};

const SR: u32 = 44_100;

fn engine() -> (SoundBank, Mixer) {
    SoundBank::new(EngineConfig::default().with_sample_rate(SR)).unwrap()
}

fn sine(freq: f32) -> VoicePatch {
    VoicePatch::new("sine")
        .channel(ChannelPatch::new(Waveform::Sine, freq))
        .gain(1.0)
}

fn peak_frequency(samples: &[f32]) -> f32 {
    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    FftPlanner::new()
        .plan_fft_forward(buffer.len())
        .process(&mut buffer);

    let (bin, _) = buffer[..buffer.len() / 2]
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0f32), |best, (i, c)| {
            let power = c.norm_sqr();
            if power > best.1 {
                (i, power)
            } else {
                best
            }
        });
    bin as f32 * SR as f32 / samples.len() as f32
}

#[test]
fn renders_silence_with_empty_bank() {
    let (_bank, mut mixer) = engine();
    let mut left = vec![1.0; 512];
    let mut right = vec![1.0; 512];
    mixer.render_stereo(&mut left, &mut right);
    assert!(left.iter().chain(&right).all(|&s| s == 0.0));
}

#[test]
fn played_sound_reaches_output() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &presets::laser()).unwrap();
    bank.play(id).unwrap();

    let mut out = vec![0.0; 1_024];
    mixer.render_interleaved(&mut out, 2);
    assert!(out.iter().any(|s| s.abs() > 0.01));
    assert!(out.iter().all(|s| s.abs() <= 1.0));
    assert!(bank.handle(id).unwrap().is_playing());
}

#[test]
fn sine_voice_has_expected_pitch() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &sine(440.0)).unwrap();
    bank.play(id).unwrap();

    let mut out = vec![0.0; 8_192];
    mixer.render_mono(&mut out);

    let resolution = SR as f32 / out.len() as f32;
    let peak = peak_frequency(&out);
    assert!(
        (peak - 440.0).abs() <= resolution,
        "peak at {peak} Hz, expected 440 Hz"
    );
}

#[test]
fn duty_cycle_keeps_pitch() {
    let (mut bank, mut mixer) = engine();
    let patch = VoicePatch::new("pulse")
        .channel(ChannelPatch::new(Waveform::Square, 441.0).duty(0.2))
        .gain(1.0);
    let id = bank.load(1, &patch).unwrap();
    bank.play(id).unwrap();

    let mut out = vec![0.0; 8_192];
    mixer.render_mono(&mut out);

    let resolution = SR as f32 / out.len() as f32;
    assert!((peak_frequency(&out) - 441.0).abs() <= resolution);
}

#[test]
fn hard_pan_silences_the_other_side() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &sine(330.0)).unwrap();
    let handle = bank.handle_mut(id).unwrap();
    handle.set_pan(-1.0);
    handle.play().unwrap();

    let mut left = vec![0.0; 512];
    let mut right = vec![0.0; 512];
    mixer.render_stereo(&mut left, &mut right);
    assert!(left.iter().any(|&s| s.abs() > 0.1));
    assert!(right.iter().all(|&s| s.abs() < 1e-6));
}

#[test]
fn centered_pan_is_constant_power() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &sine(330.0)).unwrap();
    bank.play(id).unwrap();

    let mut left = vec![0.0; 256];
    let mut right = vec![0.0; 256];
    mixer.render_stereo(&mut left, &mut right);

    let (mut mono_bank, mut mono_mixer) = engine();
    let id = mono_bank.load(1, &sine(330.0)).unwrap();
    mono_bank.play(id).unwrap();
    let mut mono = vec![0.0; 256];
    mono_mixer.render_mono(&mut mono);

    for ((l, r), m) in left.iter().zip(&right).zip(&mono) {
        approx::assert_abs_diff_eq!(*l, *r, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(l * l + r * r, m * m, epsilon = 1e-5);
    }
}

#[test]
fn interleaved_matches_stereo() {
    let render = |interleaved: bool| {
        let (mut bank, mut mixer) = engine();
        let id = bank.load(1, &presets::powerup()).unwrap();
        bank.handle(id).unwrap().set_pan(0.4);
        bank.play(id).unwrap();

        if interleaved {
            let mut out = vec![0.0; 1_000];
            mixer.render_interleaved(&mut out, 2);
            out
        } else {
            let mut left = vec![0.0; 500];
            let mut right = vec![0.0; 500];
            mixer.render_stereo(&mut left, &mut right);
            left.iter()
                .zip(&right)
                .flat_map(|(&l, &r)| [l, r])
                .collect()
        }
    };

    assert_eq!(render(true), render(false));
}

#[test]
fn block_size_sets_pass_length_not_output() {
    let render = |block_size: usize| {
        let config = EngineConfig {
            block_size,
            ..EngineConfig::default()
        };
        let (mut bank, mut mixer) = SoundBank::new(config).unwrap();
        assert_eq!(mixer.block_size(), block_size);

        let patch = VoicePatch::new("warble")
            .lfo(LfoPatch::new(Waveform::Sine, 7.0))
            .channel(ChannelPatch::new(Waveform::Saw, 600.0).modulated(Modulation::Fm, 0, 20.0));
        let id = bank.load(1, &patch).unwrap();
        bank.handle(id).unwrap().set_pan(-0.3);
        bank.play(id).unwrap();

        let mut out = vec![0.0; 6_000];
        mixer.render_interleaved(&mut out, 2);
        out
    };

    let reference = render(EngineConfig::default().block_size);
    assert!(reference.iter().any(|&s| s != 0.0));
    assert_eq!(render(64), reference);
    assert_eq!(render(1), reference);
}

#[test]
fn rendering_is_deterministic() {
    let render = || {
        let (mut bank, mut mixer) = engine();
        let id = bank.load(1, &presets::explosion()).unwrap();
        bank.play(id).unwrap();
        let mut out = vec![0.0; 4_096];
        mixer.render_mono(&mut out);
        out
    };
    assert_eq!(render(), render());
}

#[test]
fn one_shot_ends_and_reports_not_playing() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &presets::coin()).unwrap();
    bank.play(id).unwrap();

    let mut out = vec![0.0; 1_024];
    mixer.render_mono(&mut out);
    assert!(bank.handle(id).unwrap().is_playing());

    // 90 ms note + 120 ms release is well under one second
    for _ in 0..43 {
        mixer.render_mono(&mut out);
    }
    assert!(out.iter().all(|&s| s == 0.0));
    assert!(!bank.handle(id).unwrap().is_playing());
}

#[test]
fn pause_and_resume_through_the_bank() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &sine(440.0)).unwrap();
    bank.play(id).unwrap();

    let mut out = vec![0.0; 256];
    mixer.render_mono(&mut out);

    bank.handle_mut(id).unwrap().pause().unwrap();
    mixer.render_mono(&mut out);
    assert!(out.iter().all(|&s| s == 0.0));

    bank.handle_mut(id).unwrap().resume().unwrap();
    mixer.render_mono(&mut out);
    assert!(out.iter().any(|&s| s != 0.0));
}

#[test]
fn gain_and_mute_apply_next_block() {
    let (mut bank, mut mixer) = engine();
    let id = bank.load(1, &sine(440.0)).unwrap();
    bank.play(id).unwrap();

    let mut loud = vec![0.0; 256];
    mixer.render_mono(&mut loud);
    let loud_peak = loud.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(loud_peak > 0.9);

    bank.handle(id).unwrap().mute();
    let mut muted = vec![1.0; 256];
    mixer.render_mono(&mut muted);
    assert!(muted.iter().all(|&s| s == 0.0));
}

#[test]
fn shutdown_silences_and_returns_voices() {
    let (mut bank, mut mixer) = engine();
    for (i, patch) in presets::all().iter().enumerate() {
        let id = bank.load(i as u32, patch).unwrap();
        bank.play(id).unwrap();
    }

    let mut out = vec![0.0; 512];
    mixer.render_mono(&mut out);
    assert!(out.iter().any(|&s| s != 0.0));
    assert_eq!(mixer.voice_count(), presets::all().len());

    bank.shutdown();
    mixer.render_mono(&mut out);
    assert!(out.iter().all(|&s| s == 0.0));
    assert!(mixer.is_shut_down());
    assert_eq!(mixer.voice_count(), 0);
    assert_eq!(bank.collect_retired(), presets::all().len());
    assert_eq!(bank.live_voices(), 0);

    assert_eq!(bank.load(99, &presets::coin()), Err(Error::ShutDown));
}

#[test]
fn duplicate_resource_keeps_the_original() {
    let (mut bank, _mixer) = engine();
    let first = bank.load(5, &presets::coin()).unwrap();
    assert_eq!(
        bank.load(5, &presets::alarm()),
        Err(Error::DuplicateResource(5))
    );
    assert_eq!(bank.find_by_res_id(5), Some(first));
    assert_eq!(bank.len(), 1);
}
