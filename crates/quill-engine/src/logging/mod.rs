//! Logging utilities.
//!
//! Engine code logs through the `log` facade; binaries and tests pick the
//! backend. `init_logging` installs `env_logger` for hosts that want it.

mod init;

pub use init::{init_logging, LoggingConfig};