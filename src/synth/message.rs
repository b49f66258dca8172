/// Discrete commands sent from a `VoiceHandle` to its `Voice`.
///
/// Drained at the top of every render block. Continuous values (gain, pan,
/// loop) don't go through here; they live in `VoiceShared`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    /// Restart every channel from the beginning with the gate high.
    Play,
    /// Lower the gate; envelopes release naturally.
    Stop,
    /// Output silence and freeze all state.
    Pause,
    Resume,
    SetFrequency { channel: usize, hz: f32 },
    SetDuty { channel: usize, duty: f32 },
    SetVolume { channel: usize, volume: f32 },
    SetModArg { channel: usize, mod_arg: f32 },
}
