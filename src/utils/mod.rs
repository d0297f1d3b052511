//! Utility functions module
//!
//! This module contains various utility functions including resource name
//! validation and generation, retry logic, HTTP client construction, and
//! output formatting helpers.

pub mod format;
pub mod naming;
pub mod network;
pub mod retry;

pub use format::*;
pub use naming::*;
pub use network::*;
pub use retry::*;
