//! Laser shot.
//!
//! A saw swept by a fast falling-saw LFO through frequency modulation. The
//! ±400 Hz deviation at 25 Hz is what gives the "pew".

use crate::{
    dsp::{modulate::Modulation, waveform::Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
};

pub fn laser() -> VoicePatch {
    VoicePatch::new("laser")
        .lfo(LfoPatch::new(Waveform::Saw, 25.0))
        .channel(
            ChannelPatch::new(Waveform::Saw, 1_200.0)
                .modulated(Modulation::Fm, 0, -400.0)
                .envelope(0.5, 80.0, 0.3, 60.0)
                .volume(0.7),
        )
        .note_length_ms(140.0)
        .gain(0.5)
}
