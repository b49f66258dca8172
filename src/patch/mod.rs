//! Declarative voice descriptions.
//!
//! A `VoicePatch` is plain data: it can be written by hand, produced by a
//! preset function, or loaded from JSON with the `serde` feature. `build`
//! turns it into a live `Voice` and its `VoiceHandle`. All allocation happens
//! there, on the control thread.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::Envelope,
        lfo::Lfo,
        modulate::Modulation,
        waveform::Waveform,
        wavetable::{SynthParams, WaveTable},
    },
    io::converter::ms_to_samples,
    synth::{
        handle::{DEFAULT_GAIN, DEFAULT_PAN},
        voice::{Channel, Voice},
        VoiceHandle,
    },
    Result,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePatch {
    pub name: String,
    pub channels: Vec<ChannelPatch>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lfos: Vec<LfoPatch>,
    /// Gate length; `None` holds until stopped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub note_length_ms: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default = "default_gain"))]
    pub gain: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pan: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub looping: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPatch {
    pub waveform: Waveform,
    pub frequency: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_duty"))]
    pub duty: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_volume"))]
    pub volume: f32,
    /// Fraction of a cycle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phase_offset: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modulation: Modulation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mod_arg: f32,
    /// Index into the patch's `lfos`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lfo: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub envelope: Option<EnvelopePatch>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePatch {
    pub attack_ms: f32,
    pub decay_ms: f32,
    pub sustain_level: f32,
    pub release_ms: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoPatch {
    pub waveform: Waveform,
    pub frequency: f32,
}

#[cfg(feature = "serde")]
fn default_gain() -> f32 {
    DEFAULT_GAIN
}

#[cfg(feature = "serde")]
fn default_duty() -> f32 {
    0.5
}

#[cfg(feature = "serde")]
fn default_volume() -> f32 {
    1.0
}

impl ChannelPatch {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            duty: 0.5,
            volume: 1.0,
            phase_offset: 0.0,
            modulation: Modulation::None,
            mod_arg: 0.0,
            lfo: None,
            envelope: None,
        }
    }

    pub fn envelope(mut self, attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) -> Self {
        self.envelope = Some(EnvelopePatch {
            attack_ms,
            decay_ms,
            sustain_level: sustain,
            release_ms,
        });
        self
    }

    pub fn modulated(mut self, modulation: Modulation, lfo: usize, mod_arg: f32) -> Self {
        self.modulation = modulation;
        self.lfo = Some(lfo);
        self.mod_arg = mod_arg;
        self
    }

    pub fn duty(mut self, duty: f32) -> Self {
        self.duty = duty;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    fn params(&self) -> SynthParams {
        SynthParams {
            freq: self.frequency,
            phase_offset: self.phase_offset,
            duty: self.duty,
            volume: self.volume,
            modulation: self.modulation,
            mod_arg: self.mod_arg,
        }
    }

    fn build(&self, sample_rate: u32) -> Result<Channel> {
        let mut osc = WaveTable::new(sample_rate, &self.waveform)?;
        if let Some(env) = self.envelope {
            osc.set_envelope(Some(Envelope::from_millis(
                sample_rate,
                env.attack_ms,
                env.decay_ms,
                env.sustain_level,
                env.release_ms,
            )));
        }

        let channel = Channel::new(osc, self.params());
        Ok(match self.lfo {
            Some(index) => channel.with_lfo(index),
            None => channel,
        })
    }
}

impl LfoPatch {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
        }
    }
}

impl VoicePatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
            lfos: Vec::new(),
            note_length_ms: None,
            gain: DEFAULT_GAIN,
            pan: DEFAULT_PAN,
            looping: false,
        }
    }

    pub fn channel(mut self, channel: ChannelPatch) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn lfo(mut self, lfo: LfoPatch) -> Self {
        self.lfos.push(lfo);
        self
    }

    pub fn note_length_ms(mut self, ms: f32) -> Self {
        self.note_length_ms = Some(ms);
        self
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Note length converted to samples at `sample_rate`.
    pub fn note_length_samples(&self, sample_rate: u32) -> Option<u32> {
        self.note_length_ms.map(|ms| ms_to_samples(ms, sample_rate))
    }

    /// Build the voice and its handle. Tables are generated here.
    pub fn build(&self, sample_rate: u32, command_queue: usize) -> Result<(Voice, VoiceHandle)> {
        let channels = self
            .channels
            .iter()
            .map(|channel| channel.build(sample_rate))
            .collect::<Result<Vec<_>>>()?;
        let lfos = self
            .lfos
            .iter()
            .map(|lfo| Lfo::new(sample_rate, lfo.waveform, lfo.frequency))
            .collect::<Result<Vec<_>>>()?;

        let (voice, handle) = Voice::new(channels, lfos, command_queue)?;
        let voice = voice.with_note_length(self.note_length_samples(sample_rate));

        handle.set_gain(self.gain);
        handle.set_pan(self.pan);
        handle.set_loop(self.looping);

        Ok((voice, handle))
    }
}
