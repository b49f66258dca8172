//! Real-world scenario benchmarks.
//!
//! Preset voices on their own, and a mixer full of them.

mod mixer;
mod presets;

pub use mixer::bench_mixer;
pub use presets::bench_presets;
