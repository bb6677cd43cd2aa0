//! Configuration management
//!
//! This module locates the compiled artifacts and picks the log level for a
//! test session. Every value can be overridden from the environment.

pub mod settings;

pub use settings::{HarnessConfig, GLOBAL_CONFIG};
