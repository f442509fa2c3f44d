// Core types for the Kinema video playback bridge

pub mod cache;
pub mod engine;
pub mod error;
pub mod event;
pub mod player;
pub mod source;
pub mod surface;

// Re-export commonly used types
pub use cache::{CacheConfig, ContentCache};
pub use engine::{
    EngineFactory, EngineSignal, MediaEngine, RepeatMode, SignalHandler, VideoFormat,
};
pub use error::{Result, VideoError};
pub use event::{EventConsumer, EventSinkQueue, PlayerEvent};
pub use player::VideoPlayer;
pub use source::{
    resolve, AssetResolver, ContainerKind, ResolvedSource, SourceDescriptor, SourceLocation,
    StreamDescriptor, ASSET_SCHEME,
};
pub use surface::{DrawableSurface, SurfaceProvider};
