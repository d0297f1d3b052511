//! Resource group management
//!
//! This module provides resource group models and the create-or-update
//! operation against Azure Resource Manager.

pub mod models;
pub mod operations;

pub use models::*;
pub use operations::*;
