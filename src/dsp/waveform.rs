//! Table generators.
/*
Filling a Wavetable
===================

A wavetable stores one cycle of a waveform. The oscillator does not care
what shape is in the table: pitch, duty-cycle shaping and modulation all
happen by moving the read position. Generators are therefore a separate,
swappable strategy, run once when the table is built.

Each generator maps a cycle position `t` in [0, 1) to an amplitude in
[-1, 1]:

  Sine       sin(2π t)                      pure tone
  Saw        2t - 1                         bright, buzzy
  Square     +1 for t < 0.5, else -1        hollow; duty shapes pulse width
  Triangle   4|t - round(t)| - 1            soft, flute-like
  Noise      xorshift32 per slot            hiss, explosions, hits

The duty cycle works on any table, but it is most recognisable on Square:
stretching the first half of the table and squeezing the second turns the
square into a narrow or wide pulse.

Noise is stored in the table like any other shape, so it repeats once per
cycle. Played at a low "frequency" the repeat is far too long to hear; at
higher pitches it becomes a metallic, pitched noise, which is useful in its
own right. The sequence is seeded, so a given seed always builds the same
table.

Any `Fn(f32) -> f32` is also a generator, for one-off shapes:

    let table = WaveTable::new(44_100, &|t: f32| (t * 4.0).fract() * 2.0 - 1.0)?;
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/// Fills one cycle of a wavetable.
pub trait TableGenerator {
    fn fill(&self, table: &mut [f32]);
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
    Noise {
        seed: u32,
    },
}

impl Waveform {
    pub fn noise() -> Self {
        Waveform::Noise { seed: 0x9E37_79B9 }
    }
}

impl TableGenerator for Waveform {
    fn fill(&self, table: &mut [f32]) {
        match *self {
            Waveform::Sine => fill_with(table, |t| (TAU * t).sin()),
            Waveform::Saw => fill_with(table, |t| 2.0 * t - 1.0),
            Waveform::Square => fill_with(table, |t| if t < 0.5 { 1.0 } else { -1.0 }),
            Waveform::Triangle => fill_with(table, |t| 4.0 * (t - t.round()).abs() - 1.0),
            Waveform::Noise { seed } => {
                // xorshift32 never leaves zero, so a zero seed is replaced
                let mut state = if seed == 0 { 0x9E37_79B9 } else { seed };
                for slot in table.iter_mut() {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    *slot = (state as f32 / u32::MAX as f32) * 2.0 - 1.0;
                }
            }
        }
    }
}

impl<F> TableGenerator for F
where
    F: Fn(f32) -> f32,
{
    fn fill(&self, table: &mut [f32]) {
        fill_with(table, |t| self(t).clamp(-1.0, 1.0));
    }
}

fn fill_with(table: &mut [f32], shape: impl Fn(f32) -> f32) {
    let len = table.len() as f64;
    for (i, slot) in table.iter_mut().enumerate() {
        // position computed in f64 so large tables stay evenly spaced
        let t = (i as f64 / len) as f32;
        *slot = shape(t);
    }
}
