/*
ADSR Envelope Implementation
============================

A linear ADSR envelope that is stepped exactly once per output sample by the
oscillator that owns it. Stage lengths are measured in samples, not seconds,
so the envelope never needs to know the sample rate.

Vocabulary
----------

  amp         The envelope's current output value (0.0 to 1.0). The
              oscillator multiplies every table sample by it.

  state       Which stage we're in: Off, Attack, Decay, Sustain or Release.

  gate        The note on/off signal handed to `calculate()` on every call.
              There are no separate note_on/note_off events: the gate is a
              level, and the envelope reacts to its edges.

  freq        The last frequency the envelope was asked to play. A change of
              frequency while the gate is high retriggers the attack, so a
              pitch change re-articulates the note.


The Shape
---------

  amp
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ samples
          A     D    Sustain    R

  attack:   amp += 1 / A          until amp reaches 1.0
  decay:    amp -= (1 - S) / D    until amp reaches S
  release:  amp -= S / R          until amp <= 0.0001

The release slope is derived from the sustain level, so a release from
Sustain takes R samples. Releasing mid-attack (amp above S) takes longer,
releasing mid-decay a little longer. With S == 0 the slope would vanish, so
the release then ramps from wherever it started over R samples.


Silence Signal
--------------

`calculate()` returns the frequency the caller should render. On the sample
where the release runs out it returns 0.0: the envelope has gone Off and
the oscillator may skip synthesis entirely. That zero is the only way the
envelope tells its owner "nothing to play".


Zero-length stages
------------------

A, D or R of zero would divide by zero. A zero-length stage completes on its
first evaluation instead: attack jumps to 1.0, decay jumps to S, release jumps
to 0 and turns the envelope Off.


Stage evaluation
----------------

Each call first applies the gate (retrigger to Attack, or enter Release),
then advances exactly one stage. The call that finishes a stage pins amp to
the stage's target and the next stage starts on the following call, so A
calls with the gate high leave amp at exactly 1.0 in Decay.

This puts the decay onset one sample later than a state machine that falls
through from a finished attack into its first decay step within the same
call. A call never evaluates two stages, so every stage target (1.0, S, 0)
is held for at least one sample.

Internally the level is accumulated in f64 so that long stages (hundreds of
thousands of samples) still land on their targets.
*/

use crate::io::converter::ms_to_samples;

/// The current stage of the envelope state machine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeState {
    #[default]
    Off, // Gate low and fully released, amp = 0
    Attack,  // Ramping up to 1.0
    Decay,   // Ramping down to the sustain level
    Sustain, // Holding at the sustain level while the gate is high
    Release, // Gate went low, ramping down to 0
}

/// Amplitude below which a release is considered finished.
pub const RELEASE_FLOOR: f32 = 0.0001;

#[derive(Debug, Clone)]
pub struct Envelope {
    // Shape (sample counts, sustain level)
    attack: u32,
    decay: u32,
    sustain: f64,
    release: u32,

    // Runtime state
    state: EnvelopeState,
    level: f64,
    freq: f32,

    // Level at which the current release began
    release_from: f64,
}

impl Envelope {
    /// Build an envelope from stage lengths in samples and a sustain level.
    ///
    /// `sustain` is clamped into [0, 1].
    pub fn adsr(attack: u32, decay: u32, sustain: f32, release: u32) -> Self {
        Self {
            attack,
            decay,
            sustain: f64::from(sustain.clamp(0.0, 1.0)),
            release,
            state: EnvelopeState::Off,
            level: 0.0,
            freq: 0.0,
            release_from: 0.0,
        }
    }

    /// Build an envelope from stage lengths in milliseconds.
    pub fn from_millis(
        sample_rate: u32,
        attack_ms: f32,
        decay_ms: f32,
        sustain: f32,
        release_ms: f32,
    ) -> Self {
        Self::adsr(
            ms_to_samples(attack_ms, sample_rate),
            ms_to_samples(decay_ms, sample_rate),
            sustain,
            ms_to_samples(release_ms, sample_rate),
        )
    }

    /// Advance the envelope by one sample.
    ///
    /// Returns the frequency to render, which is `target_freq` unless the
    /// release finished on this call, in which case it is 0.0.
    pub fn calculate(&mut self, target_freq: f32, gate_on: bool) -> f32 {
        let mut freq = target_freq;

        if gate_on {
            if target_freq != self.freq
                || matches!(self.state, EnvelopeState::Off | EnvelopeState::Release)
            {
                self.state = EnvelopeState::Attack;
            }
        } else if !matches!(self.state, EnvelopeState::Off | EnvelopeState::Release) {
            self.release_from = self.level;
            self.state = EnvelopeState::Release;
        }

        match self.state {
            EnvelopeState::Off => {}
            EnvelopeState::Attack => self.step_attack(),
            EnvelopeState::Decay => self.step_decay(),
            EnvelopeState::Sustain => self.level = self.sustain,
            EnvelopeState::Release => {
                if self.step_release() {
                    freq = 0.0;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));

        self.freq = freq;
        freq
    }

    fn step_attack(&mut self) {
        if self.attack == 0 {
            self.level = 1.0;
            self.state = EnvelopeState::Decay;
            return;
        }

        let increment = 1.0 / f64::from(self.attack);
        self.level += increment;

        // Half a step of slack absorbs accumulated rounding without ever
        // finishing a full step early.
        if self.level >= 1.0 - increment * 0.5 {
            self.level = 1.0;
            self.state = EnvelopeState::Decay;
        }
    }

    fn step_decay(&mut self) {
        if self.decay == 0 {
            self.level = self.sustain;
            self.state = EnvelopeState::Sustain;
            return;
        }

        let decrement = (1.0 - self.sustain) / f64::from(self.decay);
        self.level -= decrement;

        if self.level <= self.sustain + decrement * 0.5 {
            self.level = self.sustain;
            self.state = EnvelopeState::Sustain;
        }
    }

    /// Returns true when the release finished on this step.
    fn step_release(&mut self) -> bool {
        if self.release == 0 {
            self.finish_release();
            return true;
        }

        let slope = if self.sustain > 0.0 {
            self.sustain
        } else {
            self.release_from
        };
        self.level = (self.level - slope / f64::from(self.release)).max(0.0);

        if self.level <= f64::from(RELEASE_FLOOR) {
            self.finish_release();
            return true;
        }
        false
    }

    fn finish_release(&mut self) {
        self.level = 0.0;
        self.state = EnvelopeState::Off;
    }

    /// Current amplitude multiplier (0.0 to 1.0).
    pub fn amp(&self) -> f32 {
        self.level as f32
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Last frequency recorded by `calculate()`.
    pub fn freq(&self) -> f32 {
        self.freq
    }

    /// Returns true if the envelope is producing output (not Off).
    pub fn is_active(&self) -> bool {
        !matches!(self.state, EnvelopeState::Off)
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn decay(&self) -> u32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain as f32
    }

    pub fn release(&self) -> u32 {
        self.release
    }

    /// Force the envelope Off and silent. Used on teardown only.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Off;
        self.level = 0.0;
        self.freq = 0.0;
        self.release_from = 0.0;
    }
}
