//! Control-side access to a voice.
//!
//! A `VoiceHandle` never touches the voice directly. Discrete commands go
//! through a bounded `rtrb` queue; gain, pan and loop are atomics the render
//! side reads once per block.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use atomic_float::AtomicF32;
use rtrb::Producer;
use tracing::warn;

use crate::{synth::message::VoiceMessage, Error, Result};

/// Cache-line aligned atomic f32.
#[derive(Debug)]
#[repr(align(64))]
pub(crate) struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub(crate) fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug, Default)]
#[repr(align(64))]
pub(crate) struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub(crate) fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

pub const DEFAULT_GAIN: f32 = 0.5;
pub const DEFAULT_PAN: f32 = 0.0;

/// State shared between a voice and its handle.
#[derive(Debug)]
pub struct VoiceShared {
    gain: AtomicFloat,
    pan: AtomicFloat,
    looping: AtomicFlag,
    // written by the render side
    sounding: AtomicFlag,
    // set by the bank on unload; the mixer hands the voice back
    retire: AtomicFlag,
}

impl Default for VoiceShared {
    fn default() -> Self {
        Self {
            gain: AtomicFloat::new(DEFAULT_GAIN),
            pan: AtomicFloat::new(DEFAULT_PAN),
            looping: AtomicFlag::new(false),
            sounding: AtomicFlag::new(false),
            retire: AtomicFlag::new(false),
        }
    }
}

impl VoiceShared {
    pub fn gain(&self) -> f32 {
        self.gain.get()
    }

    pub fn pan(&self) -> f32 {
        self.pan.get()
    }

    pub fn looping(&self) -> bool {
        self.looping.get()
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding.get()
    }

    pub(crate) fn set_sounding(&self, sounding: bool) {
        self.sounding.set(sounding);
    }

    pub(crate) fn retire_requested(&self) -> bool {
        self.retire.get()
    }

    pub(crate) fn request_retire(&self) {
        self.retire.set(true);
    }
}

pub struct VoiceHandle {
    tx: Producer<VoiceMessage>,
    shared: Arc<VoiceShared>,
    channels: usize,
}

impl VoiceHandle {
    pub(crate) fn new(tx: Producer<VoiceMessage>, shared: Arc<VoiceShared>, channels: usize) -> Self {
        Self {
            tx,
            shared,
            channels,
        }
    }

    fn send(&mut self, msg: VoiceMessage) -> Result<()> {
        if self.tx.is_abandoned() {
            return Err(Error::ShutDown);
        }
        self.tx.push(msg).map_err(|_| {
            warn!(?msg, "voice command queue full, dropping command");
            Error::QueueFull
        })
    }

    fn check_channel(&self, index: usize) -> Result<()> {
        if index < self.channels {
            Ok(())
        } else {
            Err(Error::InvalidChannel {
                index,
                count: self.channels,
            })
        }
    }

    pub fn play(&mut self) -> Result<()> {
        self.send(VoiceMessage::Play)
    }

    pub fn stop(&mut self) -> Result<()> {
        self.send(VoiceMessage::Stop)
    }

    pub fn pause(&mut self) -> Result<()> {
        self.send(VoiceMessage::Pause)
    }

    pub fn resume(&mut self) -> Result<()> {
        self.send(VoiceMessage::Resume)
    }

    pub fn gain(&self) -> f32 {
        self.shared.gain()
    }

    /// Clamped into [0, 1].
    pub fn set_gain(&self, gain: f32) {
        let gain = if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) };
        self.shared.gain.set(gain);
    }

    pub fn mute(&self) {
        self.set_gain(0.0);
    }

    pub fn pan(&self) -> f32 {
        self.shared.pan()
    }

    /// Clamped into [-1, 1]. -1 is hard left.
    pub fn set_pan(&self, pan: f32) {
        let pan = if pan.is_nan() { 0.0 } else { pan.clamp(-1.0, 1.0) };
        self.shared.pan.set(pan);
    }

    pub fn looping(&self) -> bool {
        self.shared.looping()
    }

    pub fn set_loop(&self, looping: bool) {
        self.shared.looping.set(looping);
    }

    /// True from the block that starts playback until the last channel
    /// has released. Lags the audio by up to one block.
    pub fn is_playing(&self) -> bool {
        self.shared.is_sounding()
    }

    pub fn channel_count(&self) -> usize {
        self.channels
    }

    pub fn set_frequency(&mut self, channel: usize, hz: f32) -> Result<()> {
        self.check_channel(channel)?;
        self.send(VoiceMessage::SetFrequency { channel, hz })
    }

    pub fn set_duty(&mut self, channel: usize, duty: f32) -> Result<()> {
        self.check_channel(channel)?;
        self.send(VoiceMessage::SetDuty { channel, duty })
    }

    pub fn set_volume(&mut self, channel: usize, volume: f32) -> Result<()> {
        self.check_channel(channel)?;
        self.send(VoiceMessage::SetVolume { channel, volume })
    }

    pub fn set_mod_arg(&mut self, channel: usize, mod_arg: f32) -> Result<()> {
        self.check_channel(channel)?;
        self.send(VoiceMessage::SetModArg { channel, mod_arg })
    }

    pub fn shared(&self) -> &Arc<VoiceShared> {
        &self.shared
    }
}
