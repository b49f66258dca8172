//! Ready-made game sound effects.
//!
//! Each preset is a `VoicePatch`. Load one into a `SoundBank`, or tweak the
//! patch first: they are plain data and meant as starting points.
//!
//! # Example
//!
//! ```
//! use sfx_synth::{presets, synth::SoundBank, EngineConfig};
//!
//! let (mut bank, _mixer) = SoundBank::new(EngineConfig::default()).unwrap();
//! let coin = bank.load(1, &presets::coin()).unwrap();
//! bank.play(coin).unwrap();
//! ```

mod alarm;
mod coin;
mod explosion;
mod jump;
mod laser;
mod powerup;

pub use alarm::alarm;
pub use coin::coin;
pub use explosion::explosion;
pub use jump::jump;
pub use laser::laser;
pub use powerup::powerup;

use crate::patch::VoicePatch;

/// Every preset with its name, in pad order.
pub fn all() -> Vec<VoicePatch> {
    vec![coin(), laser(), jump(), explosion(), powerup(), alarm()]
}
