/*
Voice
=====

One playable sound effect: up to four oscillator channels and the LFOs that
feed them. The voice is owned by the render side (see `synth::mixer`); the
game talks to it through a `VoiceHandle`.

Vocabulary
----------

  channel     One WaveTable (with its own envelope) plus the parameters it
              is rendered with and, optionally, the index of an LFO.

  gate        High while the note is held. Every channel sees the same gate.

  note length Optional gate duration in samples. When it runs out the gate
              drops by itself, which is how one-shot effects end.

  transport   Idle, Playing (gate high) or Releasing (gate low, envelopes
              still ringing). Pause is orthogonal: a paused voice outputs
              silence and nothing advances.


Block Flow
----------

  1. Drain the command queue.
  2. Paused or Idle: output silence, done.
  3. Split the block where the note length runs out, so the gate drops on
     the exact sample.
  4. Per span: render each LFO once into its scratch buffer, synthesize each
     channel into the channel scratch buffer and add it to the output.
  5. Once releasing and every channel has gone quiet, either retrigger (loop
     on, not stopped by hand) or go Idle.
  6. Scale the sum by gain and clamp to [-1, 1].

Channels never see each other's buffers or state. Two channels naming the
same LFO read the same block of LFO samples, rendered once.
*/

use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};

use crate::{
    dsp::{
        lfo::Lfo,
        mix::{apply_gain_clamped, sum_in_place},
        wavetable::{SynthParams, WaveTable},
    },
    synth::{
        handle::{VoiceHandle, VoiceShared},
        message::VoiceMessage,
    },
    Error, Result, MAX_BLOCK_SIZE, MAX_CHANNELS,
};

/// Granularity at which a releasing voice checks for silence.
const RELEASE_SPAN: usize = 64;

pub struct Channel {
    osc: WaveTable,
    params: SynthParams,
    lfo: Option<usize>,
}

impl Channel {
    pub fn new(osc: WaveTable, params: SynthParams) -> Self {
        Self {
            osc,
            params,
            lfo: None,
        }
    }

    /// Feed this channel's modulation from the voice's LFO at `index`.
    pub fn with_lfo(mut self, index: usize) -> Self {
        self.lfo = Some(index);
        self
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn osc(&self) -> &WaveTable {
        &self.osc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Idle,
    Playing,
    // `stopped` is set when the release came from an explicit stop, which
    // suppresses looping
    Releasing { stopped: bool },
}

pub struct Voice {
    channels: Vec<Channel>,
    lfos: Vec<Lfo>,
    lfo_buffers: Vec<Box<[f32]>>,
    channel_buffer: Box<[f32]>,

    rx: Consumer<VoiceMessage>,
    shared: Arc<VoiceShared>,

    transport: Transport,
    paused: bool,
    note_length: Option<u32>,
    elapsed: u32,
}

impl Voice {
    /// Build a voice and the handle that controls it.
    ///
    /// Fails if there are more than four channels, or a channel names an LFO
    /// the voice doesn't have.
    pub fn new(
        channels: Vec<Channel>,
        lfos: Vec<Lfo>,
        command_queue: usize,
    ) -> Result<(Self, VoiceHandle)> {
        if channels.len() > MAX_CHANNELS {
            return Err(Error::TooManyChannels {
                count: channels.len(),
                max: MAX_CHANNELS,
            });
        }
        if command_queue == 0 {
            return Err(Error::InvalidQueueCapacity(command_queue));
        }
        for channel in &channels {
            if let Some(index) = channel.lfo {
                if index >= lfos.len() {
                    return Err(Error::UnknownLfo {
                        index,
                        count: lfos.len(),
                    });
                }
            }
        }

        let (tx, rx) = RingBuffer::new(command_queue);
        let shared = Arc::new(VoiceShared::default());
        let handle = VoiceHandle::new(tx, Arc::clone(&shared), channels.len());

        let lfo_buffers = lfos
            .iter()
            .map(|_| vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice())
            .collect();

        let voice = Self {
            channels,
            lfos,
            lfo_buffers,
            channel_buffer: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
            rx,
            shared,
            transport: Transport::Idle,
            paused: false,
            note_length: None,
            elapsed: 0,
        };

        Ok((voice, handle))
    }

    /// Gate duration in samples. `None` holds until stopped.
    pub fn with_note_length(mut self, samples: Option<u32>) -> Self {
        self.note_length = samples;
        self
    }

    pub fn note_length(&self) -> Option<u32> {
        self.note_length
    }

    pub fn shared(&self) -> &Arc<VoiceShared> {
        &self.shared
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Render the next block. Never allocates or blocks.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain_messages();

        if self.paused || self.transport == Transport::Idle {
            out.fill(0.0);
            self.publish();
            return;
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }

        apply_gain_clamped(out, self.shared.gain());
        self.publish();
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                VoiceMessage::Play => self.restart(),
                VoiceMessage::Stop => {
                    if self.transport != Transport::Idle {
                        self.transport = Transport::Releasing { stopped: true };
                    }
                }
                VoiceMessage::Pause => self.paused = true,
                VoiceMessage::Resume => self.paused = false,
                VoiceMessage::SetFrequency { channel, hz } => {
                    if let Some(ch) = self.channels.get_mut(channel) {
                        ch.params.freq = hz;
                    }
                }
                VoiceMessage::SetDuty { channel, duty } => {
                    if let Some(ch) = self.channels.get_mut(channel) {
                        ch.params.duty = duty;
                    }
                }
                VoiceMessage::SetVolume { channel, volume } => {
                    if let Some(ch) = self.channels.get_mut(channel) {
                        ch.params.volume = volume;
                    }
                }
                VoiceMessage::SetModArg { channel, mod_arg } => {
                    if let Some(ch) = self.channels.get_mut(channel) {
                        ch.params.mod_arg = mod_arg;
                    }
                }
            }
        }
    }

    /// Back to the first sample with the gate high.
    fn restart(&mut self) {
        for channel in &mut self.channels {
            channel.osc.reset();
        }
        for lfo in &mut self.lfos {
            lfo.reset_phase();
        }
        self.transport = Transport::Playing;
        self.paused = false;
        self.elapsed = 0;
    }

    fn render_chunk(&mut self, chunk: &mut [f32]) {
        let mut start = 0;

        while start < chunk.len() {
            let mut end = chunk.len();

            match self.transport {
                Transport::Idle => {
                    chunk[start..].fill(0.0);
                    return;
                }
                Transport::Playing => {
                    if let Some(length) = self.note_length {
                        let remaining = length.saturating_sub(self.elapsed) as usize;
                        if remaining == 0 {
                            self.transport = Transport::Releasing { stopped: false };
                            continue;
                        }
                        end = end.min(start + remaining);
                    }
                }
                // short spans so a finished release is noticed promptly
                Transport::Releasing { .. } => end = end.min(start + RELEASE_SPAN),
            }

            let gate = self.transport == Transport::Playing;
            self.render_span(&mut chunk[start..end], gate);
            if gate {
                self.elapsed = self.elapsed.saturating_add((end - start) as u32);
            }
            start = end;

            if let Transport::Releasing { stopped } = self.transport {
                if !self.channels.iter().any(|ch| ch.osc.is_sounding(false)) {
                    if self.shared.looping() && !stopped {
                        self.restart();
                    } else {
                        self.transport = Transport::Idle;
                    }
                }
            }
        }
    }

    fn render_span(&mut self, out: &mut [f32], gate: bool) {
        let n = out.len();

        for (lfo, buffer) in self.lfos.iter_mut().zip(self.lfo_buffers.iter_mut()) {
            lfo.render(&mut buffer[..n]);
        }

        out.fill(0.0);
        for channel in &mut self.channels {
            let lfo = channel.lfo.map(|index| &self.lfo_buffers[index][..n]);
            let scratch = &mut self.channel_buffer[..n];
            channel.osc.synth_samples(scratch, &channel.params, lfo, gate);
            sum_in_place(out, scratch);
        }
    }

    fn publish(&self) {
        self.shared.set_sounding(self.transport != Transport::Idle);
    }

    /// Force every channel silent. Used on engine shutdown.
    pub fn silence(&mut self) {
        for channel in &mut self.channels {
            channel.osc.reset();
        }
        self.transport = Transport::Idle;
        self.paused = false;
        self.publish();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playing or releasing.
    pub fn is_active(&self) -> bool {
        self.transport != Transport::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{envelope::Envelope, modulate::Modulation, waveform::Waveform};

    const SR: u32 = 44_100;

    fn square_channel(freq: f32, env: Envelope) -> Channel {
        let osc = WaveTable::new(SR, &Waveform::Square)
            .unwrap()
            .with_envelope(env);
        Channel::new(osc, SynthParams::tone(freq, 1.0))
    }

    fn plain_voice() -> (Voice, VoiceHandle) {
        let channel = square_channel(441.0, Envelope::adsr(0, 0, 1.0, 10));
        Voice::new(vec![channel], Vec::new(), 16).unwrap()
    }

    #[test]
    fn rejects_more_than_four_channels() {
        let channels = (0..5)
            .map(|_| square_channel(440.0, Envelope::adsr(1, 1, 1.0, 1)))
            .collect();
        assert!(matches!(
            Voice::new(channels, Vec::new(), 8),
            Err(Error::TooManyChannels { count: 5, max: 4 })
        ));
    }

    #[test]
    fn rejects_unknown_lfo() {
        let channel = square_channel(440.0, Envelope::adsr(1, 1, 1.0, 1)).with_lfo(1);
        let lfo = Lfo::new(SR, Waveform::Sine, 5.0).unwrap();
        assert!(matches!(
            Voice::new(vec![channel], vec![lfo], 8),
            Err(Error::UnknownLfo { index: 1, count: 1 })
        ));
    }

    #[test]
    fn silent_until_played() {
        let (mut voice, _handle) = plain_voice();
        let mut out = vec![1.0; 128];
        voice.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn play_applies_gain() {
        let (mut voice, mut handle) = plain_voice();
        handle.set_gain(0.25);
        handle.play().unwrap();

        let mut out = vec![0.0; 64];
        voice.render(&mut out);
        // square at full envelope, scaled by gain
        assert!(out.iter().all(|s| (s.abs() - 0.25).abs() < 1e-6));
        assert!(handle.is_playing());
    }

    #[test]
    fn sum_is_clamped() {
        let channels = (0..4)
            .map(|_| square_channel(441.0, Envelope::adsr(0, 0, 1.0, 10)))
            .collect();
        let (mut voice, mut handle) = Voice::new(channels, Vec::new(), 8).unwrap();
        handle.set_gain(1.0);
        handle.play().unwrap();

        let mut out = vec![0.0; 256];
        voice.render(&mut out);
        assert!(out.iter().all(|&s| s.abs() == 1.0));
    }

    #[test]
    fn stop_releases_then_goes_idle() {
        let (mut voice, mut handle) = plain_voice();
        handle.play().unwrap();
        let mut out = vec![0.0; 128];
        voice.render(&mut out);

        handle.stop().unwrap();
        voice.render(&mut out);
        assert!(out[..5].iter().any(|&s| s != 0.0), "release is audible");
        assert!(out[20..].iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
        assert!(!handle.is_playing());
    }

    #[test]
    fn note_length_drops_gate_on_exact_sample() {
        let channel = square_channel(441.0, Envelope::adsr(0, 0, 1.0, 0));
        let (voice, mut handle) = Voice::new(vec![channel], Vec::new(), 8).unwrap();
        let mut voice = voice.with_note_length(Some(100));
        handle.set_gain(1.0);
        handle.play().unwrap();

        let mut out = vec![0.0; 256];
        voice.render(&mut out);
        assert!(out[..100].iter().all(|&s| s.abs() == 1.0));
        assert!(out[100..].iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn note_length_spans_blocks() {
        let channel = square_channel(441.0, Envelope::adsr(0, 0, 1.0, 0));
        let (voice, mut handle) = Voice::new(vec![channel], Vec::new(), 8).unwrap();
        let mut voice = voice.with_note_length(Some(150));
        handle.play().unwrap();

        let mut out = vec![0.0; 100];
        voice.render(&mut out);
        assert!(out.iter().all(|&s| s != 0.0));
        voice.render(&mut out);
        assert!(out[..50].iter().all(|&s| s != 0.0));
        assert!(out[50..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn looping_retriggers_after_release() {
        let channel = square_channel(441.0, Envelope::adsr(0, 0, 1.0, 0));
        let (voice, mut handle) = Voice::new(vec![channel], Vec::new(), 8).unwrap();
        let mut voice = voice.with_note_length(Some(100));
        handle.set_loop(true);
        handle.play().unwrap();

        let mut out = vec![0.0; 350];
        voice.render(&mut out);
        // gate drops at 100, the release span finds silence, restart at 164
        assert!(out[..100].iter().all(|&s| s != 0.0));
        assert!(out[100..164].iter().all(|&s| s == 0.0));
        assert!(out[164..264].iter().all(|&s| s != 0.0));
        assert!(voice.is_active());
    }

    #[test]
    fn explicit_stop_ends_a_loop() {
        let (mut voice, mut handle) = plain_voice();
        handle.set_loop(true);
        handle.play().unwrap();
        let mut out = vec![0.0; 64];
        voice.render(&mut out);

        handle.stop().unwrap();
        let mut out = vec![0.0; 256];
        voice.render(&mut out);
        voice.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!voice.is_active());
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let (mut reference, mut ref_handle) = plain_voice();
        let (mut paused, mut handle) = plain_voice();
        ref_handle.play().unwrap();
        handle.play().unwrap();

        let mut a = vec![0.0; 100];
        let mut b = vec![0.0; 100];
        reference.render(&mut a);
        paused.render(&mut b);

        handle.pause().unwrap();
        paused.render(&mut b);
        assert!(b.iter().all(|&s| s == 0.0));
        assert!(paused.is_paused());

        handle.resume().unwrap();
        reference.render(&mut a);
        paused.render(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn channels_are_independent() {
        let lfo = || Lfo::new(SR, Waveform::Sine, 6.0).unwrap();
        let fm = || {
            let mut channel = square_channel(330.0, Envelope::adsr(10, 20, 0.7, 30)).with_lfo(0);
            channel.params = channel.params.with_modulation(Modulation::Fm, 40.0);
            channel
        };
        let mut dm = square_channel(220.0, Envelope::adsr(5, 5, 0.5, 5)).with_lfo(0);
        dm.params = dm.params.with_modulation(Modulation::Dm, 0.0);

        let (mut both, mut both_handle) = Voice::new(vec![fm(), dm], vec![lfo()], 8).unwrap();
        let (mut solo, mut solo_handle) = Voice::new(vec![fm()], vec![lfo()], 8).unwrap();

        both_handle.play().unwrap();
        solo_handle.play().unwrap();
        let mut out = vec![0.0; 512];
        both.render(&mut out);
        solo.render(&mut out);

        let shared = both.channels()[0].osc();
        let alone = solo.channels()[0].osc();
        assert_eq!(shared.phase(), alone.phase());
        assert_eq!(
            shared.envelope().map(|e| e.amp()),
            alone.envelope().map(|e| e.amp())
        );
    }

    #[test]
    fn parameter_messages_reach_channels() {
        let (mut voice, mut handle) = plain_voice();
        handle.set_frequency(0, 220.0).unwrap();
        handle.set_duty(0, 0.3).unwrap();
        handle.set_volume(0, 0.6).unwrap();
        handle.set_mod_arg(0, 2.0).unwrap();

        let mut out = vec![0.0; 16];
        voice.render(&mut out);
        let params = voice.channels()[0].params();
        assert_eq!(params.freq, 220.0);
        assert_eq!(params.duty, 0.3);
        assert_eq!(params.volume, 0.6);
        assert_eq!(params.mod_arg, 2.0);
    }

    #[test]
    fn long_blocks_are_chunked() {
        let (mut voice, mut handle) = plain_voice();
        handle.play().unwrap();
        let mut out = vec![0.0; MAX_BLOCK_SIZE * 2 + 17];
        voice.render(&mut out);
        assert!(out.iter().all(|&s| s != 0.0));
    }
}
