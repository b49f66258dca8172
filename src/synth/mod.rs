// Purpose: Voices and everything needed to play them
// Control side: SoundBank + VoiceHandle. Render side: Mixer + Voice.

pub mod bank;
pub mod handle;
pub mod message;
pub mod mixer;
pub mod voice;

pub use bank::{ResourceId, SoundBank, SoundId};
pub use handle::{VoiceHandle, VoiceShared};
pub use message::VoiceMessage;
pub use mixer::Mixer;
pub use voice::{Channel, Voice};
