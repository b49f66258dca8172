//! Explosion.
//!
//! Noise read at a low rate for a rumbling body, with a second, faster noise
//! channel for the crack. AM from a square LFO makes the rumble stutter.

use crate::{
    dsp::{modulate::Modulation, waveform::Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
};

pub fn explosion() -> VoicePatch {
    VoicePatch::new("explosion")
        .lfo(LfoPatch::new(Waveform::Square, 14.0))
        .channel(
            ChannelPatch::new(Waveform::Noise { seed: 0x5EED }, 60.0)
                .modulated(Modulation::Am, 0, 0.25)
                .envelope(5.0, 400.0, 0.0, 300.0),
        )
        .channel(
            ChannelPatch::new(Waveform::Noise { seed: 0xB00 }, 900.0)
                .envelope(1.0, 90.0, 0.0, 40.0)
                .volume(0.5),
        )
        .note_length_ms(450.0)
        .gain(0.7)
}
