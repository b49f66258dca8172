/// Equal-tempered frequency of a MIDI note number (A4 = 69 = 440 Hz).
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Milliseconds to a whole number of samples. Negative input counts as 0.
pub fn ms_to_samples(ms: f32, sample_rate: u32) -> u32 {
    (ms.max(0.0) * sample_rate as f32 / 1000.0).round() as u32
}

pub fn samples_to_ms(samples: u32, sample_rate: u32) -> f32 {
    samples as f32 * 1000.0 / sample_rate as f32
}
