//! Engine-wide settings shared by the sound bank and the mixer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result, MAX_BLOCK_SIZE};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz. Also the length of every wavetable.
    pub sample_rate: u32,
    /// Frames the mixer renders per pass, at most `MAX_BLOCK_SIZE`. Device
    /// buffers of any length are rendered in passes of this size.
    pub block_size: usize,
    /// Upper bound on loaded voices.
    pub max_voices: usize,
    /// Capacity of each voice's command queue.
    pub command_queue: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_size: 512,
            max_voices: 32,
            command_queue: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize {
                size: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        if self.max_voices == 0 {
            return Err(Error::InvalidVoiceLimit(self.max_voices));
        }
        if self.command_queue == 0 {
            return Err(Error::InvalidQueueCapacity(self.command_queue));
        }
        Ok(())
    }
}
