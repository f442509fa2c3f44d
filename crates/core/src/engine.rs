// Media engine collaborator interface

use crate::error::Result;
use crate::source::{ContainerKind, StreamDescriptor};

/// Engine repeat mode; the looping flag maps to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    All,
}

/// Raw decoded video track metadata as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFormat {
    pub width: u32,
    pub height: u32,
    /// Rotation in degrees applied at render time (0, 90, 180 or 270)
    pub rotation_degrees: u32,
}

/// Asynchronous engine signals, delivered on the engine's own threads.
///
/// The trailing group is diagnostic-only: the player logs those signals and
/// never translates them into consumer events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSignal {
    /// Preparation finished; duration and track metadata are queryable
    Ready,

    /// The engine stalled waiting for data
    BufferingStarted,

    /// The engine caught up and resumed
    BufferingEnded,

    /// Playback failed; the session stays alive
    Error { message: String },

    /// Playback reached the end of the media
    Completed,

    TracksChanged,
    TimelineChanged,
    PositionDiscontinuity,
    PlaybackParametersChanged,
}

/// Callback installed by the player instance to receive engine signals.
pub type SignalHandler = Box<dyn Fn(EngineSignal) + Send + Sync>;

/// One decode/render session, exclusively owned by a player instance.
///
/// Commands issued before the `Ready` signal are tolerated by the engine's
/// own buffering; this layer never queues or rejects them.
pub trait MediaEngine: Send {
    /// Install the signal callback. Must be set before `prepare` so no
    /// signal is lost.
    fn set_signal_handler(&mut self, handler: SignalHandler);

    /// Bind the drawable surface frames are rendered onto.
    fn bind_surface(&mut self, surface_id: i64) -> Result<()>;

    /// Build the media source for `stream` and begin asynchronous
    /// preparation. Returns once the request is issued.
    fn prepare(&mut self, stream: &StreamDescriptor, container: ContainerKind) -> Result<()>;

    fn play(&mut self);
    fn pause(&mut self);

    /// Out-of-range positions are clamped by the engine.
    fn seek_to(&mut self, position_ms: i64);

    fn set_volume(&mut self, volume: f32);
    fn set_repeat_mode(&mut self, mode: RepeatMode);

    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;
    fn buffered_position_ms(&self) -> u64;

    /// Video track metadata, available once preparation finished.
    fn video_format(&self) -> Option<VideoFormat>;

    /// Halt playback. Called before `release` during disposal.
    fn stop(&mut self);

    /// Release the session and all engine-side resources.
    fn release(&mut self);
}

/// Creates engine sessions for the registry.
pub trait EngineFactory: Send + Sync {
    fn create_session(&self) -> Result<Box<dyn MediaEngine>>;
}
