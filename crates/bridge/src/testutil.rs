// Shared fakes for bridge tests

use kinema_core::{
    AssetResolver, ContainerKind, DrawableSurface, EngineFactory, EngineSignal, EventConsumer,
    MediaEngine, PlayerEvent, RepeatMode, Result, SignalHandler, StreamDescriptor, SurfaceProvider,
    VideoFormat,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use crate::router::HostContext;

/// One fake engine session; tests drive it by raising signals.
#[derive(Default)]
pub struct FakeSession {
    handler: Mutex<Option<SignalHandler>>,
    prepared: Mutex<Option<(String, ContainerKind)>>,
    volume: Mutex<Option<f32>>,
    repeat: Mutex<Option<RepeatMode>>,
    format: Mutex<Option<VideoFormat>>,
    duration_ms: AtomicU64,
    position_ms: AtomicU64,
    buffered_ms: AtomicU64,
    stopped: AtomicBool,
    released: AtomicBool,
}

impl FakeSession {
    pub fn raise(&self, signal: EngineSignal) {
        let handler = self.handler.lock();
        if let Some(handler) = handler.as_ref() {
            handler(signal);
        }
    }

    pub fn prepared_container(&self) -> Option<ContainerKind> {
        self.prepared.lock().as_ref().map(|(_, kind)| *kind)
    }

    pub fn prepared_url(&self) -> Option<String> {
        self.prepared.lock().as_ref().map(|(url, _)| url.clone())
    }

    pub fn volume(&self) -> Option<f32> {
        *self.volume.lock()
    }

    pub fn repeat_mode(&self) -> Option<RepeatMode> {
        *self.repeat.lock()
    }

    pub fn set_duration(&self, duration_ms: u64) {
        self.duration_ms.store(duration_ms, Ordering::SeqCst);
    }

    pub fn set_position(&self, position_ms: u64) {
        self.position_ms.store(position_ms, Ordering::SeqCst);
    }

    pub fn set_format(&self, format: VideoFormat) {
        *self.format.lock() = Some(format);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

struct FakeEngine {
    session: Arc<FakeSession>,
}

impl MediaEngine for FakeEngine {
    fn set_signal_handler(&mut self, handler: SignalHandler) {
        *self.session.handler.lock() = Some(handler);
    }

    fn bind_surface(&mut self, _surface_id: i64) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, stream: &StreamDescriptor, container: ContainerKind) -> Result<()> {
        *self.session.prepared.lock() = Some((stream.url.clone(), container));
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek_to(&mut self, _position_ms: i64) {}

    fn set_volume(&mut self, volume: f32) {
        *self.session.volume.lock() = Some(volume);
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        *self.session.repeat.lock() = Some(mode);
    }

    fn position_ms(&self) -> u64 {
        self.session.position_ms.load(Ordering::SeqCst)
    }

    fn duration_ms(&self) -> u64 {
        self.session.duration_ms.load(Ordering::SeqCst)
    }

    fn buffered_position_ms(&self) -> u64 {
        self.session.buffered_ms.load(Ordering::SeqCst)
    }

    fn video_format(&self) -> Option<VideoFormat> {
        *self.session.format.lock()
    }

    fn stop(&mut self) {
        self.session.stopped.store(true, Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.session.released.store(true, Ordering::SeqCst);
    }
}

/// Engine factory that records every session it hands out.
pub struct SharedEngines {
    sessions: Mutex<Vec<Arc<FakeSession>>>,
}

impl SharedEngines {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(Vec::new()),
        })
    }

    pub fn sessions(&self) -> Vec<Arc<FakeSession>> {
        self.sessions.lock().clone()
    }

    pub fn session(&self, index: usize) -> Arc<FakeSession> {
        self.sessions.lock()[index].clone()
    }
}

impl EngineFactory for SharedEngines {
    fn create_session(&self) -> Result<Box<dyn MediaEngine>> {
        let session = Arc::new(FakeSession::default());
        self.sessions.lock().push(session.clone());
        Ok(Box::new(FakeEngine { session }))
    }
}

struct FakeSurface {
    id: i64,
}

impl DrawableSurface for FakeSurface {
    fn id(&self) -> i64 {
        self.id
    }

    fn release(&mut self) {}
}

struct FakeSurfaces {
    next_id: AtomicI64,
}

impl SurfaceProvider for FakeSurfaces {
    fn create_surface(&self) -> Result<Box<dyn DrawableSurface>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSurface { id }))
    }
}

struct FakeAssets;

impl AssetResolver for FakeAssets {
    fn lookup(&self, asset: &str, package: Option<&str>) -> String {
        match package {
            Some(package) => format!("packages/{}/{}", package, asset),
            None => format!("flutter_assets/{}", asset),
        }
    }
}

/// Host context wired to fakes; caching disabled.
pub fn host(engines: &Arc<SharedEngines>) -> HostContext {
    HostContext {
        surfaces: Arc::new(FakeSurfaces {
            next_id: AtomicI64::new(1),
        }),
        assets: Arc::new(FakeAssets),
        engines: engines.clone(),
        cache_dir: None,
    }
}

#[derive(Clone, Default)]
pub struct RecordingConsumer {
    events: Arc<Mutex<Vec<PlayerEvent>>>,
    errors: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingConsumer {
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().clone()
    }

    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().clone()
    }
}

impl EventConsumer for RecordingConsumer {
    fn on_event(&self, event: PlayerEvent) {
        self.events.lock().push(event);
    }

    fn on_error(&self, kind: &str, message: &str) {
        self.errors.lock().push((kind.into(), message.into()));
    }
}
