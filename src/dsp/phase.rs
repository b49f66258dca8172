//! Phase accumulator wrapping.
/*
Phase in Sample Units
=====================

The oscillator's phase is not measured in radians. A wavetable holds one
cycle of the waveform at 1 Hz, so it is exactly `sample_rate` entries long,
and the phase is simply a position in that table:

    0 ──────────── sample_rate/2 ──────────── sample_rate
    │   first half-period   │   second half-period   │

Stepping the phase by `freq` table entries per output sample plays the cycle
`freq` times a second. No trigonometry per sample, just an add and a lookup.

Every advance must be folded back into [0, sample_rate). The duty-cycle
shaping additionally needs to jump the phase into a particular half-period
when the duty collapses to 0 or 1, which is what the half-period wraps are
for. Both wraps keep the position within the half, so a phase 10 entries
into the first half lands 10 entries into the second half and vice versa.
*/

/// Wrap `phase` into `[0, chunk)`.
///
/// Non-finite input (a runaway FM index, a zero duty portion) resets to 0
/// so one bad sample can't poison the accumulator forever.
#[inline]
pub fn wrap_around(phase: f32, chunk: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase.rem_euclid(chunk);
    // rem_euclid rounds tiny negative inputs up to exactly `chunk`
    if wrapped >= chunk {
        0.0
    } else {
        wrapped
    }
}

/// Move `phase` into the first half-period, `[0, sample_rate / 2)`.
#[inline]
pub fn wrap_first_half(phase: f32, sample_rate: f32) -> f32 {
    wrap_around(phase, sample_rate * 0.5)
}

/// Move `phase` into the second half-period, `[sample_rate / 2, sample_rate)`.
#[inline]
pub fn wrap_second_half(phase: f32, sample_rate: f32) -> f32 {
    let half = sample_rate * 0.5;
    half + wrap_around(phase, half)
}

/// Table slot for a wrapped phase.
///
/// Rounding can push a phase just below the table end onto `len`, which maps
/// back to slot 0.
#[inline]
pub fn table_index(phase: f32, len: usize) -> usize {
    (phase.round() as usize) % len
}
