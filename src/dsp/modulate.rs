//! Modulation modes and the per-sample modulation math.

/*
Waveform Modulation
===================

A channel can be modulated by an LFO buffer the same length as its output.
The modulator is consumed per sample, not averaged per block: the modes
here reshape the waveform itself, so block-rate updates would be audible as
steps.

Vocabulary
----------

  modulator   The LFO buffer, bipolar: values in [-1.0, +1.0].

  mod_arg     A per-mode argument. Its meaning depends on the mode:
                AM  bias added to the modulator before it scales the sample
                FM  depth, in table entries per sample (≈ Hz of deviation)
                PM  unused (the modulator is the offset)
                DM  unused


The Modes
---------

AM (amplitude modulation):

    sample *= unipolar(lfo + 2 × mod_arg)

    With mod_arg = 0 the sample is scaled by 0..1 (tremolo down to silence).
    Raising mod_arg lifts the floor: mod_arg = 0.5 scales by 0.5..1.5.

FM (frequency modulation):

    phase += lfo × mod_arg        after the regular phase step

    The extra phase step shifts the instantaneous frequency by up to
    ±mod_arg Hz. Slow LFOs give vibrato, fast ones give sirens and zaps.

PM (phase modulation):

    lookup = phase + sample_rate × lfo

    The modulator replaces the channel's static phase offset: it shifts where
    the table is read without touching the accumulator.

DM (duty modulation):

    duty = mean(duty, unipolar(lfo))

    Each sample pulls the duty cycle halfway toward the modulator. The
    duty drifts with the LFO instead of following it exactly, which gives
    the soft pulse-width sweep of classic chip sounds.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::lfo::bipolar_to_unipolar;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modulation {
    /// No modulation; the LFO buffer is never read.
    #[default]
    None,
    /// Amplitude modulation.
    Am,
    /// Frequency modulation.
    Fm,
    /// Phase modulation.
    Pm,
    /// Duty-cycle modulation.
    Dm,
}

impl Modulation {
    /// Whether this mode reads the LFO buffer.
    #[inline]
    pub fn needs_lfo(self) -> bool {
        !matches!(self, Modulation::None)
    }
}

/// Scale a sample by the unipolar form of a bipolar modulator.
///
/// # Example
/// ```
/// use sfx_synth::dsp::modulate::amplitude_modulate;
/// assert_eq!(amplitude_modulate(0.8, 1.0), 0.8);
/// assert_eq!(amplitude_modulate(0.8, -1.0), 0.0);
/// ```
#[inline]
pub fn amplitude_modulate(sample: f32, modulator: f32) -> f32 {
    sample * bipolar_to_unipolar(modulator)
}

/// Average two values.
#[inline]
pub fn mean(a: f32, b: f32) -> f32 {
    (a + b) * 0.5
}
