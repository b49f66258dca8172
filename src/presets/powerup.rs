//! Power-up.
//!
//! A triangle with vibrato-like phase modulation and a quiet square an
//! octave up. Long release so it rings out.

use crate::{
    dsp::{modulate::Modulation, waveform::Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
};

pub fn powerup() -> VoicePatch {
    VoicePatch::new("powerup")
        .lfo(LfoPatch::new(Waveform::Sine, 6.0))
        .channel(
            ChannelPatch::new(Waveform::Triangle, 523.25)
                .modulated(Modulation::Pm, 0, 0.0)
                .envelope(10.0, 150.0, 0.6, 250.0),
        )
        .channel(
            ChannelPatch::new(Waveform::Square, 1_046.5)
                .envelope(30.0, 100.0, 0.3, 200.0)
                .volume(0.25),
        )
        .note_length_ms(350.0)
        .gain(0.5)
}
