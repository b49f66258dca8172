//! Low frequency oscillators feeding the modulation modes.

/*
LFO Buffers
===========

The oscillator never owns its modulator. Each render call is handed a slice
of LFO samples, one per output sample, and the modulation mode decides what
to do with them (see `dsp::modulate`). Where those samples come from is the
caller's business: usually an `Lfo`, which is nothing more than a second
`WaveTable` running at a sub-audio rate with modulation off.

Vocabulary
----------

  control-rate    Frequencies below hearing, ~0.01 to ~20 Hz. An LFO at
                  control rate is heard as movement: wobble, sweep, tremolo.

  audio-rate      Push the LFO past ~20 Hz and the movement turns into new
                  timbre. FM and AM sidebands are what give lasers and alarms
                  their metallic edge.

  bipolar         -1.0 to +1.0. What an `Lfo` renders, and what FM and PM
                  consume directly.

  unipolar        0.0 to 1.0. AM and DM bias the bipolar signal into this
                  range first: unipolar = (bipolar + 1) / 2

    bipolar   unipolar
    -1.0      0.0
     0.0      0.5
    +1.0      1.0


Sharing
-------

A voice renders each of its LFOs once per block into a scratch buffer, and
any number of channels may read that buffer. Two channels sharing an LFO see
the same block of samples, so they move in lockstep, but neither can touch
the other's oscillator or envelope.

An LFO is free-running: its phase carries across blocks and is only reset
when the voice is retriggered from scratch.
*/

use crate::{
    dsp::{
        waveform::Waveform,
        wavetable::{SynthParams, WaveTable},
    },
    Result,
};

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Convert unipolar signal (0.0 to 1.0) to bipolar (-1.0 to +1.0).
#[inline]
pub fn unipolar_to_bipolar(unipolar: f32) -> f32 {
    (unipolar * 2.0) - 1.0
}

/// Calculate samples per LFO period.
///
/// # Example
/// ```
/// use sfx_synth::dsp::lfo::samples_per_period;
/// let samples = samples_per_period(5.0, 44100.0);
/// assert_eq!(samples, 8820.0); // 5 Hz at 44.1kHz
/// ```
#[inline]
pub fn samples_per_period(frequency_hz: f32, sample_rate: f32) -> f32 {
    sample_rate / frequency_hz
}

/// A free-running bipolar modulator.
#[derive(Debug, Clone)]
pub struct Lfo {
    osc: WaveTable,
    params: SynthParams,
}

impl Lfo {
    pub fn new(sample_rate: u32, waveform: Waveform, frequency: f32) -> Result<Self> {
        Ok(Self {
            osc: WaveTable::new(sample_rate, &waveform)?,
            params: SynthParams::tone(frequency, 1.0),
        })
    }

    /// Render the next `out.len()` modulator samples.
    pub fn render(&mut self, out: &mut [f32]) {
        self.osc.synth_samples(out, &self.params, None, true);
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.params.freq = frequency;
    }

    pub fn frequency(&self) -> f32 {
        self.params.freq
    }

    pub fn reset_phase(&mut self) {
        self.osc.reset_phase();
    }
}
