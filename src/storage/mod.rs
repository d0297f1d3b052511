//! Storage account management
//!
//! This module provides storage account models, kind/SKU validation, and the
//! asynchronous create operation against Azure Resource Manager.

pub mod models;
pub mod operations;

pub use models::*;
pub use operations::*;
