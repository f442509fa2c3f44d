// Per-instance video player state machine

use crate::cache::ContentCache;
use crate::engine::{EngineSignal, MediaEngine, RepeatMode};
use crate::error::Result;
use crate::event::{EventConsumer, EventSinkQueue, PlayerEvent};
use crate::source::ResolvedSource;
use crate::surface::DrawableSurface;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

/// Buffered-range sampling period while the engine reports buffering.
const BUFFERING_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Granularity at which the sampler notices a stop request.
const SAMPLER_POLL_SLICE: Duration = Duration::from_millis(10);

struct PlayerInner {
    engine: Box<dyn MediaEngine>,
    surface: Box<dyn DrawableSurface>,
    cache: Option<ContentCache>,
    initialized: bool,
    buffering: bool,
    disposed: bool,
    sampler: Option<BufferSampler>,
}

/// One live player instance.
///
/// Owns the engine session, the surface binding and the event sink queue.
/// Control commands and engine signals are serialized by the instance lock;
/// once disposal begins, every late signal and sampler tick is inert.
pub struct VideoPlayer {
    handle: i64,
    sink: EventSinkQueue,
    inner: Mutex<PlayerInner>,
    // Handed to the engine callback and the sampler thread
    weak_self: Weak<VideoPlayer>,
}

impl VideoPlayer {
    /// Build the instance and immediately request preparation.
    ///
    /// Returns as soon as the prepare request is issued; readiness arrives
    /// asynchronously as the single `Initialized` event.
    pub fn create(
        handle: i64,
        engine: Box<dyn MediaEngine>,
        surface: Box<dyn DrawableSurface>,
        cache: Option<ContentCache>,
        source: &ResolvedSource,
    ) -> Result<Arc<Self>> {
        let player = Arc::new_cyclic(|weak| Self {
            handle,
            sink: EventSinkQueue::new(),
            inner: Mutex::new(PlayerInner {
                engine,
                surface,
                cache,
                initialized: false,
                buffering: false,
                disposed: false,
                sampler: None,
            }),
            weak_self: weak.clone(),
        });

        {
            let mut inner = player.inner.lock();
            let surface_id = inner.surface.id();
            if let Err(err) = inner.engine.bind_surface(surface_id) {
                drop(inner);
                player.dispose();
                return Err(err);
            }
            // Handler goes in before prepare so no early signal is lost
            let weak = player.weak_self.clone();
            inner.engine.set_signal_handler(Box::new(move |signal| {
                if let Some(player) = weak.upgrade() {
                    player.handle_signal(signal);
                }
            }));
            if let Err(err) = inner.engine.prepare(&source.stream, source.container) {
                drop(inner);
                player.dispose();
                return Err(err);
            }
        }

        log::info!(
            "[player {}] preparing {} ({:?})",
            handle,
            source.stream.url,
            source.container
        );
        Ok(player)
    }

    pub fn handle(&self) -> i64 {
        self.handle
    }

    /// Attach the external event stream consumer, flushing anything emitted
    /// before it was listening.
    pub fn attach_consumer(&self, consumer: Box<dyn EventConsumer>) {
        self.sink.attach(consumer);
    }

    pub fn detach_consumer(&self) {
        self.sink.detach();
    }

    pub fn play(&self) {
        self.inner.lock().engine.play();
    }

    pub fn pause(&self) {
        self.inner.lock().engine.pause();
    }

    /// Out-of-range positions are clamped by the engine, not here.
    pub fn seek_to(&self, position_ms: i64) {
        self.inner.lock().engine.seek_to(position_ms);
    }

    /// Apply volume, clamped to [0.0, 1.0] before it reaches the engine.
    pub fn set_volume(&self, volume: f64) {
        let bracketed = volume.clamp(0.0, 1.0) as f32;
        self.inner.lock().engine.set_volume(bracketed);
    }

    pub fn set_looping(&self, looping: bool) {
        let mode = if looping {
            RepeatMode::All
        } else {
            RepeatMode::Off
        };
        self.inner.lock().engine.set_repeat_mode(mode);
    }

    /// Current playback position, queried from the engine and never cached.
    pub fn position(&self) -> u64 {
        self.inner.lock().engine.position_ms()
    }

    /// Engine signal entry point, called from the engine's callback thread.
    fn handle_signal(&self, signal: EngineSignal) {
        let mut stopped_sampler = None;
        {
            let mut inner = self.inner.lock();
            if inner.disposed {
                return;
            }
            match signal {
                EngineSignal::Ready => self.send_initialized(&mut inner),
                EngineSignal::BufferingStarted => {
                    if !inner.buffering {
                        inner.buffering = true;
                        inner.sampler = Some(BufferSampler::spawn(self.weak_self.clone()));
                        self.sink.emit(PlayerEvent::BufferingStart);
                    }
                }
                EngineSignal::BufferingEnded => {
                    if inner.buffering {
                        inner.buffering = false;
                        stopped_sampler = inner.sampler.take();
                        self.sink.emit(PlayerEvent::BufferingEnd);
                    }
                }
                EngineSignal::Error { message } => {
                    log::error!("[player {}] engine error: {}", self.handle, message);
                    self.sink.emit_error("VideoError", &message);
                }
                other => {
                    // Diagnostic only; deliberately outside the event contract
                    log::debug!("[player {}] engine signal ignored: {:?}", self.handle, other);
                }
            }
        }
        // Join outside the lock so a mid-tick sampler can finish its sample
        if let Some(sampler) = stopped_sampler {
            sampler.stop();
        }
    }

    fn send_initialized(&self, inner: &mut PlayerInner) {
        // Engines may repeat the ready signal; only the first transition counts
        if inner.initialized {
            return;
        }
        inner.initialized = true;

        let duration_ms = inner.engine.duration_ms();
        let (width, height) = match inner.engine.video_format() {
            Some(format) => {
                // Portrait rotations swap width/height so the reported
                // dimensions match the visually upright frame
                if format.rotation_degrees == 90 || format.rotation_degrees == 270 {
                    (Some(format.height), Some(format.width))
                } else {
                    (Some(format.width), Some(format.height))
                }
            }
            None => (None, None),
        };

        log::info!(
            "[player {}] initialized, duration {} ms",
            self.handle,
            duration_ms
        );
        self.sink.emit(PlayerEvent::Initialized {
            duration_ms,
            width,
            height,
        });
    }

    fn send_buffering_update(&self) {
        let inner = self.inner.lock();
        // A tick that lost the race against the buffering exit (or against
        // disposal) must emit nothing
        if inner.disposed || !inner.buffering {
            return;
        }
        let buffered_ms = inner.engine.buffered_position_ms();
        // A single range starting at zero; consumers accept a range list
        self.sink.emit(PlayerEvent::BufferingUpdate {
            ranges: vec![(0, buffered_ms)],
        });
    }

    /// Tear down the instance.
    ///
    /// Sampler first so it cannot fire against a half-released engine,
    /// engine stop before engine release, surface and cache in between.
    pub fn dispose(&self) {
        let sampler = {
            let mut inner = self.inner.lock();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.buffering = false;
            inner.sampler.take()
        };
        if let Some(sampler) = sampler {
            sampler.stop();
        }

        let mut inner = self.inner.lock();
        if inner.initialized {
            inner.engine.stop();
        }
        inner.surface.release();
        self.sink.detach();
        inner.engine.release();
        if let Some(cache) = inner.cache.take() {
            cache.release();
        }
        log::info!("[player {}] disposed", self.handle);
    }
}

/// Recurring buffered-range sampler.
///
/// A plain thread with a stop flag; `stop` joins it, so once `stop` returns
/// no further sample can be emitted.
struct BufferSampler {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl BufferSampler {
    fn spawn(weak: Weak<VideoPlayer>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let thread = thread::spawn(move || loop {
            if stop_flag.load(Ordering::SeqCst) {
                break;
            }
            match weak.upgrade() {
                Some(player) => player.send_buffering_update(),
                None => break,
            }
            // Sleep in short slices so stop requests take effect promptly
            let mut slept = Duration::ZERO;
            while slept < BUFFERING_SAMPLE_INTERVAL {
                if stop_flag.load(Ordering::SeqCst) {
                    return;
                }
                thread::sleep(SAMPLER_POLL_SLICE);
                slept += SAMPLER_POLL_SLICE;
            }
        });

        Self {
            stop,
            thread: Some(thread),
        }
    }

    fn stop(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for BufferSampler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}
