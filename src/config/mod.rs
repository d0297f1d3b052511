//! Configuration management module
//!
//! This module handles configuration loading, validation, and defaults from
//! the configuration file, environment variables, and command-line overrides.

pub mod settings;

pub use settings::*;
