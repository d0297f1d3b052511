//! Long-running operation support
//!
//! Asynchronous provider operations return a handle immediately and complete
//! at an indeterminate later time; this module polls such a handle until it
//! reaches a terminal state.

pub mod poller;

pub use poller::*;
