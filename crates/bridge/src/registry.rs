// Registry of live player instances keyed by surface handle

use crate::command::{CommandReply, ControlOp};
use crate::router::HostContext;
use kinema_core::{
    resolve, ContentCache, EventConsumer, Result, SourceDescriptor, VideoError, VideoPlayer,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns the table of live player instances.
///
/// The table mutex only guards insert/remove/lookup; instances are called
/// outside it, so commands against distinct handles proceed concurrently.
pub struct PlayerRegistry {
    players: Mutex<HashMap<i64, Arc<VideoPlayer>>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate a surface, build a player for the descriptor and insert it
    /// under the surface's identifier. Returns the new handle.
    pub fn create(&self, host: &HostContext, descriptor: &SourceDescriptor) -> Result<i64> {
        let mut surface = host.surfaces.create_surface()?;
        let handle = surface.id();

        // A cache that fails to open downgrades to uncached playback
        let cache = host.cache_dir.as_ref().and_then(|dir| {
            match ContentCache::open(dir) {
                Ok(cache) => Some(cache),
                Err(err) => {
                    log::warn!("[registry] cache unavailable, playing uncached: {}", err);
                    None
                }
            }
        });

        // A failed creation attempt must hand its surface back
        let resolved = match resolve(
            descriptor,
            host.assets.as_ref(),
            cache.as_ref().map(|c| c.config()),
        ) {
            Ok(resolved) => resolved,
            Err(err) => {
                surface.release();
                return Err(err);
            }
        };
        let engine = match host.engines.create_session() {
            Ok(engine) => engine,
            Err(err) => {
                surface.release();
                return Err(err);
            }
        };
        let player = VideoPlayer::create(handle, engine, surface, cache, &resolved)?;

        self.players.lock().insert(handle, player);
        log::info!("[registry] created player {} ({:?})", handle, resolved.container);
        Ok(handle)
    }

    /// Forward a control operation to the instance behind `handle`.
    pub fn dispatch(&self, handle: i64, op: ControlOp) -> Result<CommandReply> {
        if let ControlOp::Dispose = op {
            // Remove first: the handle must be gone even while teardown runs,
            // and a concurrent second dispose must fail, not crash
            let player = self
                .players
                .lock()
                .remove(&handle)
                .ok_or(VideoError::UnknownHandle(handle))?;
            player.dispose();
            return Ok(CommandReply::None);
        }

        let player = self.lookup(handle)?;
        match op {
            ControlOp::SetLooping(looping) => {
                player.set_looping(looping);
                Ok(CommandReply::None)
            }
            ControlOp::SetVolume(volume) => {
                player.set_volume(volume);
                Ok(CommandReply::None)
            }
            ControlOp::Play => {
                player.play();
                Ok(CommandReply::None)
            }
            ControlOp::Pause => {
                player.pause();
                Ok(CommandReply::None)
            }
            ControlOp::SeekTo(position_ms) => {
                player.seek_to(position_ms);
                Ok(CommandReply::None)
            }
            ControlOp::Position => Ok(CommandReply::Position(player.position())),
            ControlOp::Dispose => unreachable!("handled above"),
        }
    }

    /// Attach the external event stream consumer for `handle`.
    pub fn attach_consumer(&self, handle: i64, consumer: Box<dyn EventConsumer>) -> Result<()> {
        self.lookup(handle)?.attach_consumer(consumer);
        Ok(())
    }

    pub fn detach_consumer(&self, handle: i64) -> Result<()> {
        self.lookup(handle)?.detach_consumer();
        Ok(())
    }

    /// Dispose every live instance and clear the table. Used by the global
    /// reset command and by host teardown.
    pub fn reset_all(&self) {
        let players: Vec<Arc<VideoPlayer>> = {
            let mut table = self.players.lock();
            table.drain().map(|(_, player)| player).collect()
        };
        let count = players.len();
        for player in players {
            player.dispose();
        }
        if count > 0 {
            log::info!("[registry] reset, disposed {} player(s)", count);
        }
    }

    pub fn contains(&self, handle: i64) -> bool {
        self.players.lock().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.players.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.lock().is_empty()
    }

    fn lookup(&self, handle: i64) -> Result<Arc<VideoPlayer>> {
        self.players
            .lock()
            .get(&handle)
            .cloned()
            .ok_or(VideoError::UnknownHandle(handle))
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
