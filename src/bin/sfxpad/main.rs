//! sfxpad - Terminal sound-effect pad
//!
//! Run with: cargo run --bin sfxpad
//! Set SFXPAD_LOG=path to write logs (RUST_LOG filters them).

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use app::SfxPad;
use sfx_synth::presets;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // The terminal belongs to the UI, so logs only go to a file
    if let Ok(path) = std::env::var("SFXPAD_LOG") {
        let file = File::create(&path).wrap_err_with(|| format!("failed to create log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    SfxPad::new(presets::all()).run()
}
