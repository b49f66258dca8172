//! Coin pickup.
//!
//! Two square waves a fourth apart, both short. The high one is louder, so
//! the ear hears the bright "ding" with a little body underneath.

use crate::{
    dsp::waveform::Waveform,
    io::converter::midi_note_to_freq,
    patch::{ChannelPatch, VoicePatch},
};

pub fn coin() -> VoicePatch {
    VoicePatch::new("coin")
        .channel(
            ChannelPatch::new(Waveform::Square, midi_note_to_freq(88))
                .envelope(1.0, 60.0, 0.4, 120.0)
                .volume(0.6),
        )
        .channel(
            ChannelPatch::new(Waveform::Square, midi_note_to_freq(83))
                .duty(0.25)
                .envelope(1.0, 40.0, 0.2, 80.0)
                .volume(0.3),
        )
        .note_length_ms(90.0)
        .gain(0.6)
}
