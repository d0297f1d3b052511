//! Authentication module for the Azure management plane
//!
//! This module provides credential acquisition for Azure Resource Manager
//! using the ambient credential chain or an explicit service principal.

pub mod provider;

pub use provider::*;
