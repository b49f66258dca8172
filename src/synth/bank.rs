//! Control-side store of loaded sounds.
//!
//! The bank replaces a process-wide resource registry: sounds are looked up
//! by the game's resource id, addressed afterwards by an opaque `SoundId`, and
//! everything the bank loaded can be shut down in one call.

use std::{collections::HashMap, fmt, sync::Arc};

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    patch::VoicePatch,
    synth::{
        handle::{AtomicFlag, VoiceHandle},
        mixer::Mixer,
        voice::Voice,
    },
    Error, Result,
};

/// The game's identifier for a sound resource.
pub type ResourceId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u32);

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound#{}", self.0)
    }
}

struct Sound {
    res_id: ResourceId,
    handle: VoiceHandle,
}

pub struct SoundBank {
    config: EngineConfig,
    sounds: HashMap<SoundId, Sound>,
    by_resource: HashMap<ResourceId, SoundId>,
    next_id: u32,

    outbox: Producer<Box<Voice>>,
    retired: Consumer<Box<Voice>>,
    shutdown: Arc<AtomicFlag>,
    // voices handed to the mixer and not yet returned
    live: usize,
}

impl SoundBank {
    /// Create a bank and the mixer that renders its voices. The mixer goes to
    /// the audio callback.
    pub fn new(config: EngineConfig) -> Result<(Self, Mixer)> {
        config.validate()?;

        let (outbox, inbox) = RingBuffer::new(config.max_voices);
        let (retired_tx, retired) = RingBuffer::new(config.max_voices);
        let shutdown = Arc::new(AtomicFlag::new(false));

        let mixer = Mixer::new(
            config.max_voices,
            config.block_size,
            inbox,
            retired_tx,
            Arc::clone(&shutdown),
        );
        let bank = Self {
            config,
            sounds: HashMap::new(),
            by_resource: HashMap::new(),
            next_id: 0,
            outbox,
            retired,
            shutdown,
            live: 0,
        };

        info!(
            sample_rate = config.sample_rate,
            max_voices = config.max_voices,
            block_size = config.block_size,
            "sound bank ready"
        );
        Ok((bank, mixer))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build `patch` and hand it to the mixer under `res_id`.
    pub fn load(&mut self, res_id: ResourceId, patch: &VoicePatch) -> Result<SoundId> {
        self.check_insert(res_id)?;
        let (voice, handle) = patch.build(self.config.sample_rate, self.config.command_queue)?;
        self.insert_voice(res_id, voice, handle)
    }

    /// Hand an already-built voice to the mixer under `res_id`.
    pub fn insert_voice(
        &mut self,
        res_id: ResourceId,
        voice: Voice,
        handle: VoiceHandle,
    ) -> Result<SoundId> {
        self.check_insert(res_id)?;

        self.outbox.push(Box::new(voice)).map_err(|_| {
            warn!(res_id, "mixer inbox full");
            Error::QueueFull
        })?;
        self.live += 1;

        let id = SoundId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.sounds.insert(id, Sound { res_id, handle });
        self.by_resource.insert(res_id, id);

        info!(res_id, %id, "sound loaded");
        Ok(id)
    }

    fn check_insert(&mut self, res_id: ResourceId) -> Result<()> {
        if self.is_shut_down() {
            return Err(Error::ShutDown);
        }
        if self.by_resource.contains_key(&res_id) {
            return Err(Error::DuplicateResource(res_id));
        }
        self.collect_retired();
        if self.live >= self.config.max_voices {
            warn!(max = self.config.max_voices, "voice limit reached");
            return Err(Error::VoiceLimit(self.config.max_voices));
        }
        Ok(())
    }

    pub fn find_by_res_id(&self, res_id: ResourceId) -> Option<SoundId> {
        self.by_resource.get(&res_id).copied()
    }

    pub fn handle(&self, id: SoundId) -> Result<&VoiceHandle> {
        self.sounds
            .get(&id)
            .map(|sound| &sound.handle)
            .ok_or(Error::UnknownSound(id))
    }

    pub fn handle_mut(&mut self, id: SoundId) -> Result<&mut VoiceHandle> {
        self.sounds
            .get_mut(&id)
            .map(|sound| &mut sound.handle)
            .ok_or(Error::UnknownSound(id))
    }

    pub fn play(&mut self, id: SoundId) -> Result<()> {
        self.handle_mut(id)?.play()
    }

    pub fn stop(&mut self, id: SoundId) -> Result<()> {
        self.handle_mut(id)?.stop()
    }

    /// Forget a sound. The mixer returns its voice on the next block.
    pub fn unload(&mut self, id: SoundId) -> Result<()> {
        let sound = self.sounds.remove(&id).ok_or(Error::UnknownSound(id))?;
        self.by_resource.remove(&sound.res_id);
        sound.handle.shared().request_retire();
        debug!(%id, res_id = sound.res_id, "sound unloaded");
        Ok(())
    }

    /// Free voices the mixer has handed back. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while let Ok(voice) = self.retired.pop() {
            drop(voice);
            count += 1;
        }
        self.live = self.live.saturating_sub(count);
        count
    }

    /// Silence everything. The mixer outputs silence from its next block on
    /// and hands every voice back; this call never waits for it.
    pub fn shutdown(&mut self) {
        if self.is_shut_down() {
            return;
        }
        self.shutdown.set(true);
        self.sounds.clear();
        self.by_resource.clear();
        info!("sound bank shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.get()
    }

    /// Voices handed to the mixer and not yet collected.
    pub fn live_voices(&self) -> usize {
        self.live
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SoundId> + '_ {
        self.sounds.keys().copied()
    }
}
