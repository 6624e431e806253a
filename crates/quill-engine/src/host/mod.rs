//! Host-facing surface: listener callbacks and the background blocking
//! protocol.

mod blocking;
mod listener;

pub use blocking::{BlockingState, DeferredCommand};
pub use listener::{
    fingerprint,
    EngineFlag,
    EngineListener,
    ListenerDispatch,
    LoggingEvent,
    RecordedEvent,
    RecordingListener,
    ToolEvent,
};
