//! Low-level DSP primitives used by voices.
//!
//! Everything here is allocation-free once constructed and safe to call from
//! the audio callback. Wavetables are the exception: they are filled at
//! construction (or on an explicit generator change) and only read while
//! rendering.

/// Attack/decay/sustain/release envelope stepped once per sample.
pub mod envelope;
/// Low frequency oscillators and bipolar/unipolar conversion.
pub mod lfo;
/// Summing, gain and pan helpers.
pub mod mix;
/// Modulation modes and the per-sample modulation math.
pub mod modulate;
/// Phase accumulator wrapping.
pub mod phase;
/// Table generators (sine, saw, square, triangle, noise, custom).
pub mod waveform;
/// Phase-accumulating wavetable oscillator.
pub mod wavetable;

pub use envelope::{Envelope, EnvelopeState};
pub use modulate::Modulation;
pub use waveform::{TableGenerator, Waveform};
pub use wavetable::{SynthParams, WaveTable};
