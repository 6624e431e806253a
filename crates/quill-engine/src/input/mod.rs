//! Input subsystem.
//!
//! Public API is platform-agnostic: everything downstream consumes [`SInput`]
//! samples. `platform` translates windowing events into samples, `stream`
//! (de)serializes recorded sessions and `synth` generates them for tests.

mod frame;
mod state;
mod types;

pub mod platform;
pub mod stream;
pub mod synth;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    sort_stream,
    Flag,
    Flags,
    InputType,
    SInput,
    FLAGS_BEGIN_STROKE,
    FLAGS_END_STROKE,
    FLAGS_MOVE_WHILE_DOWN,
    FLAGS_MOVE_WHILE_UP,
    PRESSURE_UNKNOWN,
};
