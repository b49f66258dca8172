//! Realtime-safe wavetable synthesis for procedural game sound effects.
//!
//! Sounds are described by parameters rather than decoded from files: each
//! [`synth::voice::Voice`] drives up to four wavetable oscillators, each with
//! its own ADSR envelope and an optional LFO feeding one of four modulation
//! modes. The control side talks to voices through lock-free handles, and the
//! audio callback renders them through a [`synth::mixer::Mixer`].

pub mod config;
pub mod dsp; // Envelope, wavetable oscillator, modulation math
pub mod error;
pub mod io;
pub mod patch; // Declarative voice descriptions
pub mod presets; // Ready-made game sound effects
pub mod synth; // Voices, handles, mixer and sound bank

pub use config::EngineConfig;
pub use error::{Error, Result};

/// Largest block rendered in one pass. Longer buffers are split.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Oscillator channels per voice.
pub const MAX_CHANNELS: usize = 4;
