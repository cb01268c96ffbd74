//! Shared utilities for the valuation workspace
//!
//! Logging setup and application configuration used by the binaries.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
