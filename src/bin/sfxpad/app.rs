//! Audio setup: output device, sound bank and the render callback

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info};

use sfx_synth::{io::downmix, patch::VoicePatch, synth::SoundBank, EngineConfig};

use super::ui::{Pad, UiApp, VIS_BUFFER_SIZE};

/// Keys for the pads, in order
const PAD_KEYS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];

pub struct SfxPad {
    patches: Vec<VoicePatch>,
}

impl SfxPad {
    pub fn new(patches: Vec<VoicePatch>) -> Self {
        Self { patches }
    }

    /// Open the default output device and run the pad until the user quits
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        info!(sample_rate, channels, "output device ready");

        let config = EngineConfig::default().with_sample_rate(sample_rate);
        let (mut bank, mut mixer) = SoundBank::new(config).wrap_err("invalid engine config")?;

        let mut pads = Vec::with_capacity(self.patches.len());
        for (patch, key) in self.patches.iter().zip(PAD_KEYS) {
            let id = bank
                .load(pads.len() as u32, patch)
                .wrap_err_with(|| format!("failed to load {}", patch.name))?;
            pads.push(Pad::new(id, key, &patch.name));
        }

        // Mono tap of the output for the scope and spectrum
        let (mut tap_tx, tap_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 8);
        let mut tap_scratch = vec![0.0f32; VIS_BUFFER_SIZE];

        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _| {
                mixer.render_interleaved(data, channels);
                for block in data.chunks(tap_scratch.len() * channels.max(1)) {
                    let frames = block.len() / channels.max(1);
                    downmix(block, channels, &mut tap_scratch[..frames]);
                    for &sample in &tap_scratch[..frames] {
                        if tap_tx.push(sample).is_err() {
                            return;
                        }
                    }
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        let mut terminal = ratatui::init();
        let mut app = UiApp::new(bank, pads, tap_rx, sample_rate);
        let result = app.run(&mut terminal);
        ratatui::restore();

        // Let the mixer see the shutdown flag before the stream goes away
        app.shutdown();
        std::thread::sleep(Duration::from_millis(50));
        drop(stream);
        app.collect();

        result
    }
}
