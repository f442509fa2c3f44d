// Command router: host validation, parsing and dispatch

use crate::command::{Command, CommandCall, CommandReply};
use crate::registry::PlayerRegistry;
use kinema_core::{
    AssetResolver, EngineFactory, EventConsumer, Result, SurfaceProvider, VideoError,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Rendering-host collaborators needed to build player instances.
#[derive(Clone)]
pub struct HostContext {
    pub surfaces: Arc<dyn SurfaceProvider>,
    pub assets: Arc<dyn AssetResolver>,
    pub engines: Arc<dyn EngineFactory>,
    /// Base directory for the remote-content cache; `None` disables caching
    pub cache_dir: Option<PathBuf>,
}

/// Routes inbound commands to the registry or to a player instance.
///
/// Every command terminates in exactly one reply or one typed failure; no
/// command is serviced while no rendering host is attached.
pub struct CommandRouter {
    host: Mutex<Option<Arc<HostContext>>>,
    registry: PlayerRegistry,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            host: Mutex::new(None),
            registry: PlayerRegistry::new(),
        }
    }

    pub fn with_host(host: HostContext) -> Self {
        let router = Self::new();
        router.attach_host(host);
        router
    }

    /// Install the rendering host; commands fail with `NoHost` until then.
    pub fn attach_host(&self, host: HostContext) {
        *self.host.lock() = Some(Arc::new(host));
    }

    /// Drop the host and tear down every live instance.
    pub fn detach_host(&self) {
        *self.host.lock() = None;
        self.registry.reset_all();
        log::info!("[router] host detached");
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Service one command.
    pub fn dispatch(&self, call: &CommandCall) -> Result<CommandReply> {
        let host = self.host.lock().clone().ok_or(VideoError::NoHost)?;

        match Command::parse(call)? {
            Command::Init => {
                self.registry.reset_all();
                Ok(CommandReply::None)
            }
            Command::Create(descriptor) => {
                let handle = self.registry.create(&host, &descriptor)?;
                Ok(CommandReply::Handle(handle))
            }
            Command::Control { handle, op } => self.registry.dispatch(handle, op),
        }
    }

    /// Attach the per-handle event stream consumer.
    pub fn attach_consumer(&self, handle: i64, consumer: Box<dyn EventConsumer>) -> Result<()> {
        self.registry.attach_consumer(handle, consumer)
    }

    pub fn detach_consumer(&self, handle: i64) -> Result<()> {
        self.registry.detach_consumer(handle)
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
