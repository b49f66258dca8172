//! Alarm.
//!
//! Square wave switched between two pitches by a square LFO (FM with a hard
//! modulator), looping until stopped.

use crate::{
    dsp::{modulate::Modulation, waveform::Waveform},
    patch::{ChannelPatch, LfoPatch, VoicePatch},
};

pub fn alarm() -> VoicePatch {
    VoicePatch::new("alarm")
        .lfo(LfoPatch::new(Waveform::Square, 4.0))
        .channel(
            ChannelPatch::new(Waveform::Square, 660.0)
                .modulated(Modulation::Fm, 0, 220.0)
                .envelope(5.0, 0.0, 1.0, 20.0)
                .volume(0.6),
        )
        .note_length_ms(500.0)
        .gain(0.4)
        .looping(true)
}
