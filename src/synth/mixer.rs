//! Render-side owner of every loaded voice.
//!
//! The mixer lives inside the audio callback. New voices arrive from the
//! `SoundBank` through an inbox queue; voices that are unloaded, or every
//! voice once the engine shuts down, go back through a return queue so they
//! are freed on the control thread.

use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::{
    dsp::mix::{clamp_in_place, constant_power_pan},
    synth::{handle::AtomicFlag, voice::Voice},
};

pub struct Mixer {
    voices: Vec<Box<Voice>>,
    max_voices: usize,
    // frames mixed per pass; the scratch buffers are this long
    block_size: usize,
    inbox: Consumer<Box<Voice>>,
    retired: Producer<Box<Voice>>,
    shutdown: Arc<AtomicFlag>,
    shut_down: bool,

    voice_buffer: Box<[f32]>,
    left: Box<[f32]>,
    right: Box<[f32]>,
}

impl Mixer {
    pub(crate) fn new(
        max_voices: usize,
        block_size: usize,
        inbox: Consumer<Box<Voice>>,
        retired: Producer<Box<Voice>>,
        shutdown: Arc<AtomicFlag>,
    ) -> Self {
        Self {
            voices: Vec::with_capacity(max_voices),
            max_voices,
            block_size,
            inbox,
            retired,
            shutdown,
            shut_down: false,
            voice_buffer: vec![0.0; block_size].into_boxed_slice(),
            left: vec![0.0; block_size].into_boxed_slice(),
            right: vec![0.0; block_size].into_boxed_slice(),
        }
    }

    /// Voices currently owned by the render side.
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Frames mixed per pass. Longer buffers are rendered in several passes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Render into separate left/right buffers. Each voice is placed with a
    /// constant-power pan.
    pub fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        left.fill(0.0);
        right.fill(0.0);

        if !self.begin_block() {
            return;
        }

        let mut start = 0;
        while start < frames {
            let end = (start + self.block_size).min(frames);
            self.mix_stereo(&mut left[start..end], &mut right[start..end]);
            start = end;
        }

        clamp_in_place(&mut left[..frames]);
        clamp_in_place(&mut right[..frames]);
        self.end_block();
    }

    /// Render a mono sum, ignoring pan.
    pub fn render_mono(&mut self, out: &mut [f32]) {
        out.fill(0.0);

        if !self.begin_block() {
            return;
        }

        for chunk in out.chunks_mut(self.block_size) {
            let n = chunk.len();
            for voice in self.voices.iter_mut() {
                let buffer = &mut self.voice_buffer[..n];
                voice.render(buffer);
                for (o, v) in chunk.iter_mut().zip(buffer.iter()) {
                    *o += v;
                }
            }
        }

        clamp_in_place(out);
        self.end_block();
    }

    /// Render into an interleaved device buffer with `channels` channels.
    ///
    /// Mono devices get the unpanned sum. Stereo and wider get left and right
    /// in the first two channels and silence in the rest.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        match channels {
            0 => data.fill(0.0),
            1 => self.render_mono(data),
            _ => {
                data.fill(0.0);
                if !self.begin_block() {
                    return;
                }

                let mut left = std::mem::take(&mut self.left);
                let mut right = std::mem::take(&mut self.right);

                for frames in data.chunks_mut(self.block_size * channels) {
                    let n = frames.len() / channels;
                    self.mix_stereo(&mut left[..n], &mut right[..n]);
                    for (i, frame) in frames.chunks_exact_mut(channels).enumerate() {
                        frame[0] = left[i].clamp(-1.0, 1.0);
                        frame[1] = right[i].clamp(-1.0, 1.0);
                    }
                }

                self.left = left;
                self.right = right;
                self.end_block();
            }
        }
    }

    /// Add every voice into `left`/`right`, at most `block_size` frames.
    fn mix_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let n = left.len();
        left.fill(0.0);
        right.fill(0.0);

        for voice in self.voices.iter_mut() {
            let buffer = &mut self.voice_buffer[..n];
            voice.render(buffer);

            let (gain_l, gain_r) = constant_power_pan(voice.shared().pan());
            for ((l, r), v) in left.iter_mut().zip(right.iter_mut()).zip(buffer.iter()) {
                *l += v * gain_l;
                *r += v * gain_r;
            }
        }
    }

    /// Admit new voices and honor shutdown. Returns false when the block
    /// should stay silent.
    fn begin_block(&mut self) -> bool {
        if self.shutdown.get() && !self.shut_down {
            for voice in self.voices.iter_mut() {
                voice.silence();
            }
            self.shut_down = true;
        }

        if self.shut_down {
            // bounce anything that arrives after shutdown straight back
            while !self.retired.is_full() {
                match self.inbox.pop() {
                    Ok(voice) => {
                        let _ = self.retired.push(voice);
                    }
                    Err(_) => break,
                }
            }
            self.retire_where(|_| true);
            return false;
        }

        while self.voices.len() < self.max_voices {
            match self.inbox.pop() {
                Ok(voice) => self.voices.push(voice),
                Err(_) => break,
            }
        }
        true
    }

    fn end_block(&mut self) {
        self.retire_where(|voice| voice.shared().retire_requested());
    }

    /// Hand matching voices back to the control side. A voice stays put if the
    /// return queue is full, so nothing is ever freed here.
    fn retire_where(&mut self, retire: impl Fn(&Voice) -> bool) {
        let mut i = 0;
        while i < self.voices.len() {
            if retire(&self.voices[i]) && !self.retired.is_full() {
                let mut voice = self.voices.swap_remove(i);
                voice.silence();
                let _ = self.retired.push(voice);
            } else {
                i += 1;
            }
        }
    }
}
