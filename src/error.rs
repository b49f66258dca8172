//! Error types for control-plane operations.
//!
//! Nothing on the render path returns these: synthesis corrects bad input by
//! clamping. Errors only come out of construction, loading and the handles
//! that talk to voices from the control thread.

use thiserror::Error;

use crate::synth::bank::SoundId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid sample rate: {0}. Must be greater than zero")]
    InvalidSampleRate(u32),

    #[error("Invalid block size: {size}. Must be between 1 and {max}")]
    InvalidBlockSize { size: usize, max: usize },

    #[error("Invalid voice limit: {0}. Must be greater than zero")]
    InvalidVoiceLimit(usize),

    #[error("Invalid queue capacity: {0}. Must be greater than zero")]
    InvalidQueueCapacity(usize),

    #[error("Too many channels: {count}. A voice holds at most {max}")]
    TooManyChannels { count: usize, max: usize },

    #[error("Channel {index} does not exist (voice has {count})")]
    InvalidChannel { index: usize, count: usize },

    #[error("Channel references LFO {index}, but the voice has {count}")]
    UnknownLfo { index: usize, count: usize },

    #[error("Resource {0} is already loaded")]
    DuplicateResource(u32),

    #[error("Unknown sound: {0}")]
    UnknownSound(SoundId),

    #[error("Voice limit of {0} reached")]
    VoiceLimit(usize),

    #[error("Control queue is full")]
    QueueFull,

    #[error("Audio engine has been shut down")]
    ShutDown,
}

pub type Result<T> = core::result::Result<T, Error>;
