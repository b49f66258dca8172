//! Jump.
//!
//! A square whose duty cycle is dragged around by a sine LFO, so the
//! timbre wobbles from hollow to nasal as it plays.

use crate::{
    dsp::{modulate::Modulation, waveform::Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
};

pub fn jump() -> VoicePatch {
    VoicePatch::new("jump")
        .lfo(LfoPatch::new(Waveform::Sine, 8.0))
        .channel(
            ChannelPatch::new(Waveform::Square, 330.0)
                .modulated(Modulation::Dm, 0, 0.0)
                .envelope(2.0, 120.0, 0.5, 80.0)
                .volume(0.8),
        )
        .note_length_ms(180.0)
        .gain(0.5)
}
