// Event sink queue bridging an asynchronous producer and a late-attaching consumer

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Consumer-facing playback events, per player instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Preparation finished. Emitted at most once per instance; width and
    /// height are present only when the engine reports video track metadata.
    Initialized {
        duration_ms: u64,
        width: Option<u32>,
        height: Option<u32>,
    },

    /// The engine entered its buffering state
    BufferingStart,

    /// The engine left its buffering state
    BufferingEnd,

    /// Periodic buffered-range sample; a single `(0, buffered_ms)` range
    BufferingUpdate { ranges: Vec<(u64, u64)> },
}

/// External event stream consumer.
///
/// Implementations should be lightweight and non-blocking, and must not call
/// back into the player from either method.
pub trait EventConsumer: Send {
    fn on_event(&self, event: PlayerEvent);

    /// Called for distinguished error events instead of `on_event`.
    fn on_error(&self, kind: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum QueuedItem {
    Event(PlayerEvent),
    Error { kind: String, message: String },
}

struct SinkState {
    consumer: Option<Box<dyn EventConsumer>>,
    pending: VecDeque<QueuedItem>,
}

/// Buffers outgoing events until a consumer attaches, then switches to
/// direct synchronous delivery.
///
/// The consumer attaches strictly after the creation command has returned a
/// handle, so early events (notably the single `Initialized`) must survive
/// that race in arrival order. Normal and error payloads share one queue so
/// ordering holds across the buffer/live boundary.
pub struct EventSinkQueue {
    state: Mutex<SinkState>,
}

impl EventSinkQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SinkState {
                consumer: None,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Install a live consumer, flushing every buffered item in arrival
    /// order before going to pass-through delivery.
    pub fn attach(&self, consumer: Box<dyn EventConsumer>) {
        let mut state = self.state.lock();
        while let Some(item) = state.pending.pop_front() {
            deliver(consumer.as_ref(), item);
        }
        state.consumer = Some(consumer);
    }

    /// Revert to buffering mode; emitted events accumulate until the next
    /// attach.
    pub fn detach(&self) {
        self.state.lock().consumer = None;
    }

    pub fn is_attached(&self) -> bool {
        self.state.lock().consumer.is_some()
    }

    pub fn emit(&self, event: PlayerEvent) {
        self.push(QueuedItem::Event(event));
    }

    pub fn emit_error(&self, kind: &str, message: &str) {
        self.push(QueuedItem::Error {
            kind: kind.to_string(),
            message: message.to_string(),
        });
    }

    fn push(&self, item: QueuedItem) {
        let mut state = self.state.lock();
        match &state.consumer {
            Some(consumer) => deliver(consumer.as_ref(), item),
            None => state.pending.push_back(item),
        }
    }
}

impl Default for EventSinkQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn deliver(consumer: &dyn EventConsumer, item: QueuedItem) {
    match item {
        QueuedItem::Event(event) => consumer.on_event(event),
        QueuedItem::Error { kind, message } => consumer.on_error(&kind, &message),
    }
}
