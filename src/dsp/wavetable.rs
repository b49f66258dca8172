/*
Wavetable Oscillator
====================

The synthesis engine. One cycle of a waveform at 1 Hz is stored in a table
of `sample_rate` entries; a phase accumulator walks through it, and the
step size picks the pitch. Everything else (envelope, duty cycle,
modulation) is layered on top of that walk, per sample.

Vocabulary
----------

  table       One cycle, `sample_rate` entries, amplitudes in [-1, 1].
              Built once by a `TableGenerator`, read-only while rendering.

  phase       Position in the table, in [0, sample_rate). Persists across
              calls: consecutive buffers continue the waveform seamlessly.

  period      Samples per cycle at the current pitch: sample_rate / freq.

  duty        Share of the cycle spent in the table's first half. At 0.5
              both halves play at the same speed; at 0.25 the first half
              is rushed through in a quarter of the cycle and the second
              half stretched over the rest.

  portion     The duty share of whichever half the phase is currently in:
              `duty` in the first half, `1 - duty` in the second.


Per-Buffer Flow
---------------

  1. Ask the envelope (if any) for the effective frequency and amplitude.
  2. Frequency 0 means silence: zero the buffer and return. Nothing else is
     touched, not even the phase or the LFO buffer. An envelope that is
     Off with the gate low still returns the frequency, so the loop runs at
     amp 0 and the phase keeps moving.
  3. For every output sample:
       a. DM: pull duty toward the modulator
       b. pick the read position (PM uses the LFO as the phase offset)
       c. read the table, scale by volume and envelope amplitude
       d. step the envelope
       e. pick the portion for the half we're in
       f. advance: phase += sample_rate / (2 × portion × period)
       g. AM scales the sample, FM nudges the phase
       h. fold the phase back into [0, sample_rate)

With duty = 0.5 the step in (f) is exactly `freq`, so the cycle repeats
`freq` times a second. Other duties speed up one half and slow down the
other while keeping the full cycle the same length:

    first half:  (sr/2) / (freq / (2 × duty))        = duty × period
    second half: (sr/2) / (freq / (2 × (1 - duty)))  = (1 - duty) × period


Degenerate Duty
---------------

A duty of exactly 0 leaves no time for the first half (portion 0 would
divide by zero), and a duty of 1 leaves none for the second. When the phase
sits in a half that has no time, it is moved into the other half and that
half's portion is used for the step.


Realtime Rules
--------------

`synth_samples` never allocates, locks or fails. Bad input is corrected:
duty is clamped into [0, 1], non-finite phase resets to 0, and a missing or
short LFO buffer turns modulation off.
*/

use crate::{
    dsp::{
        envelope::Envelope,
        lfo::bipolar_to_unipolar,
        modulate::{amplitude_modulate, mean, Modulation},
        phase::{table_index, wrap_around, wrap_first_half, wrap_second_half},
        waveform::TableGenerator,
    },
    Error, Result,
};

/// Per-call synthesis parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Target pitch in Hz. 0.0 is the silent sentinel.
    pub freq: f32,
    /// Static read offset, as a fraction of a cycle.
    pub phase_offset: f32,
    /// Duty cycle, (0, 1). Boundary values are corrected internally.
    pub duty: f32,
    /// Output level, [0, 1].
    pub volume: f32,
    pub modulation: Modulation,
    /// Mode-dependent argument, see `dsp::modulate`.
    pub mod_arg: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            freq: 440.0,
            phase_offset: 0.0,
            duty: 0.5,
            volume: 1.0,
            modulation: Modulation::None,
            mod_arg: 0.0,
        }
    }
}

impl SynthParams {
    /// Plain, unmodulated tone.
    pub fn tone(freq: f32, volume: f32) -> Self {
        Self {
            freq,
            volume,
            ..Self::default()
        }
    }

    pub fn with_duty(mut self, duty: f32) -> Self {
        self.duty = duty;
        self
    }

    pub fn with_phase_offset(mut self, offset: f32) -> Self {
        self.phase_offset = offset;
        self
    }

    pub fn with_modulation(mut self, modulation: Modulation, mod_arg: f32) -> Self {
        self.modulation = modulation;
        self.mod_arg = mod_arg;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WaveTable {
    table: Box<[f32]>,
    sample_rate: u32,
    phase: f32,
    envelope: Option<Envelope>,
}

impl WaveTable {
    /// Build a table of one cycle at `sample_rate` using `generator`.
    pub fn new(sample_rate: u32, generator: &impl TableGenerator) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        let mut table = vec![0.0; sample_rate as usize].into_boxed_slice();
        generator.fill(&mut table);

        Ok(Self {
            table,
            sample_rate,
            phase: 0.0,
            envelope: None,
        })
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn set_envelope(&mut self, envelope: Option<Envelope>) {
        self.envelope = envelope;
    }

    /// Rebuild the table in place. Not for the audio thread: generators
    /// may do arbitrary work.
    pub fn set_generator(&mut self, generator: &impl TableGenerator) {
        generator.fill(&mut self.table);
    }

    /// Synthesize the next `out.len()` samples.
    ///
    /// `lfo` must be at least as long as `out` when `params.modulation`
    /// reads it; otherwise modulation is skipped for this call.
    pub fn synth_samples(
        &mut self,
        out: &mut [f32],
        params: &SynthParams,
        lfo: Option<&[f32]>,
        note_on: bool,
    ) {
        let mut amp = 1.0;
        let mut freq = params.freq;

        match self.envelope.as_mut() {
            Some(env) => {
                freq = env.calculate(params.freq, note_on);
                amp = env.amp();
            }
            None if !note_on => {
                out.fill(0.0);
                return;
            }
            None => {}
        }

        if freq == 0.0 {
            out.fill(0.0);
            return;
        }

        let (modulation, lfo) = match lfo {
            Some(buf) if params.modulation.needs_lfo() && buf.len() >= out.len() => {
                (params.modulation, buf)
            }
            _ => {
                debug_assert!(
                    !params.modulation.needs_lfo(),
                    "{:?} needs an LFO buffer of at least {} samples",
                    params.modulation,
                    out.len()
                );
                (Modulation::None, &[][..])
            }
        };

        let sample_rate = self.sample_rate as f32;
        let half = sample_rate * 0.5;
        let period = sample_rate / freq;
        let len = self.table.len();
        let mut duty = params.duty;

        for (i, sample) in out.iter_mut().enumerate() {
            if modulation == Modulation::Dm {
                duty = mean(duty, bipolar_to_unipolar(lfo[i]));
            }
            duty = duty.clamp(0.0, 1.0);

            let offset = if modulation == Modulation::Pm {
                lfo[i]
            } else {
                params.phase_offset
            };
            let lookup = wrap_around(self.phase + sample_rate * offset, sample_rate);

            *sample = self.table[table_index(lookup, len)] * params.volume * amp;

            if let Some(env) = self.envelope.as_mut() {
                env.calculate(freq, note_on);
                amp = env.amp();
            }

            let portion = if self.phase < half {
                if duty == 0.0 {
                    self.phase = wrap_second_half(self.phase, sample_rate);
                    1.0 - duty
                } else {
                    duty
                }
            } else if duty == 1.0 {
                self.phase = wrap_first_half(self.phase, sample_rate);
                duty
            } else {
                1.0 - duty
            };

            // == freq when duty == 0.5
            self.phase += sample_rate / (2.0 * portion * period);

            match modulation {
                Modulation::Am => {
                    *sample = amplitude_modulate(*sample, lfo[i] + 2.0 * params.mod_arg);
                }
                Modulation::Fm => self.phase += lfo[i] * params.mod_arg,
                // PM and DM were applied before the lookup
                _ => {}
            }

            self.phase = wrap_around(self.phase, sample_rate);
        }
    }

    /// Unmodulated tone at 50% duty.
    pub fn synth_tone(&mut self, out: &mut [f32], freq: f32, volume: f32, note_on: bool) {
        self.synth_samples(out, &SynthParams::tone(freq, volume), None, note_on);
    }

    /// Whether the next call with this gate could produce sound.
    pub fn is_sounding(&self, note_on: bool) -> bool {
        match &self.envelope {
            Some(env) => note_on || env.is_active(),
            None => note_on,
        }
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    /// Silence the oscillator: phase to 0, envelope Off.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        if let Some(env) = self.envelope.as_mut() {
            env.reset();
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    pub fn envelope_mut(&mut self) -> Option<&mut Envelope> {
        self.envelope.as_mut()
    }
}
