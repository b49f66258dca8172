//! UI-side bookkeeping for pads and the output meter

use sfx_synth::synth::SoundId;

/// One playable sound on the pad
pub struct Pad {
    pub id: SoundId,
    pub key: char,
    pub name: String,
    /// Pause is a voice command, so the UI remembers which way it toggled
    pub paused: bool,
}

impl Pad {
    pub fn new(id: SoundId, key: char, name: &str) -> Self {
        Self {
            id,
            key,
            name: name.to_string(),
            paused: false,
        }
    }
}

/// Peak and RMS of the visualization buffer
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}
