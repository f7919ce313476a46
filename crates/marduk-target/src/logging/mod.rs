//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only uses the `log`
//! facade; `env_logger` is installed here for binaries and tests that want
//! output.

mod init;

pub use init::{init_logging, LoggingConfig};
