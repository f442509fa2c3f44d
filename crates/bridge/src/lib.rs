// Kinema bridge: command routing and the player registry over kinema-core

pub mod command;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use command::{Command, CommandArgs, CommandCall, CommandReply, ControlOp};
pub use registry::PlayerRegistry;
pub use router::{CommandRouter, HostContext};

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize logging once for the host process.
pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder()
            .is_test(false)
            .filter_level(log::LevelFilter::Info)
            .try_init();
    });
}
