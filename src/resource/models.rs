//! Resource group data models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Declarative description of a resource group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroupSpec {
    pub name: String,
    pub location: String,
    pub tags: HashMap<String, String>,
}

impl ResourceGroupSpec {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            tags: HashMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A materialized resource group as returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct ResourceGroup {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "State")]
    pub provisioning_state: String,
    #[tabled(skip)]
    pub tags: HashMap<String, String>,
}
