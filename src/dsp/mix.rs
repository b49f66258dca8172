//! Summing, gain and pan helpers.

/*
Mixing Channels
===============

A voice sums its channels at equal level, then scales the sum by its gain
and hard-clamps it. Summing can exceed [-1.0, +1.0]; the clamp is the one
place where that is corrected, so individual oscillators never clip.

Panning
-------

Voices are mono. The mixer places them in the stereo field with a
constant-power pan law:

    angle = (pan + 1) × π/4          pan in [-1, +1]
    left  = cos(angle)
    right = sin(angle)

At the center both sides get ~0.707, so a sound keeps the same perceived
loudness as it moves across the field (a linear law dips by 3 dB in the
middle).
*/

use std::f32::consts::FRAC_PI_4;

/// Add signal B into signal A in-place (summing).
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range!
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());
    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Scale by `gain` and clamp to [-1.0, +1.0].
#[inline]
pub fn apply_gain_clamped(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample = (*sample * gain).clamp(-1.0, 1.0);
    }
}

/// Clamp to [-1.0, +1.0].
#[inline]
pub fn clamp_in_place(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

/// Constant-power pan gains `(left, right)` for `pan` in [-1.0, +1.0].
#[inline]
pub fn constant_power_pan(pan: f32) -> (f32, f32) {
    let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}
