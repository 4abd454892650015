//! Shared utilities for asaflow.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
