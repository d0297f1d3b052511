//! Storage account data models and types
//!
//! Kind and SKU are drawn from the provider's enumerated support set; an
//! unsupported combination is rejected locally before any request is issued.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::{GroundworkError, Result};
use crate::utils::naming::validate_storage_account_name;

/// Storage account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Storage,
    StorageV2,
    BlobStorage,
    FileStorage,
    BlockBlobStorage,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Storage => "Storage",
            AccountKind::StorageV2 => "StorageV2",
            AccountKind::BlobStorage => "BlobStorage",
            AccountKind::FileStorage => "FileStorage",
            AccountKind::BlockBlobStorage => "BlockBlobStorage",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = GroundworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "storage" => Ok(AccountKind::Storage),
            "storagev2" => Ok(AccountKind::StorageV2),
            "blobstorage" => Ok(AccountKind::BlobStorage),
            "filestorage" => Ok(AccountKind::FileStorage),
            "blockblobstorage" => Ok(AccountKind::BlockBlobStorage),
            _ => Err(GroundworkError::invalid_argument(format!(
                "Unsupported account kind '{}'. Supported kinds: Storage, StorageV2, BlobStorage, FileStorage, BlockBlobStorage",
                s
            ))),
        }
    }
}

/// Storage SKU name, carrying the replication strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuName {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "Standard_GRS")]
    StandardGrs,
    #[serde(rename = "Standard_RAGRS")]
    StandardRagrs,
    #[serde(rename = "Standard_ZRS")]
    StandardZrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
}

impl SkuName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkuName::StandardLrs => "Standard_LRS",
            SkuName::StandardGrs => "Standard_GRS",
            SkuName::StandardRagrs => "Standard_RAGRS",
            SkuName::StandardZrs => "Standard_ZRS",
            SkuName::PremiumLrs => "Premium_LRS",
        }
    }

    /// The pricing tier this SKU belongs to
    pub fn tier(&self) -> SkuTier {
        match self {
            SkuName::PremiumLrs => SkuTier::Premium,
            _ => SkuTier::Standard,
        }
    }
}

impl fmt::Display for SkuName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkuName {
    type Err = GroundworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard_lrs" => Ok(SkuName::StandardLrs),
            "standard_grs" => Ok(SkuName::StandardGrs),
            "standard_ragrs" => Ok(SkuName::StandardRagrs),
            "standard_zrs" => Ok(SkuName::StandardZrs),
            "premium_lrs" => Ok(SkuName::PremiumLrs),
            _ => Err(GroundworkError::invalid_argument(format!(
                "Unsupported SKU '{}'. Supported SKUs: Standard_LRS, Standard_GRS, Standard_RAGRS, Standard_ZRS, Premium_LRS",
                s
            ))),
        }
    }
}

/// Storage SKU pricing tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuTier {
    Standard,
    Premium,
}

impl fmt::Display for SkuTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkuTier::Standard => f.write_str("Standard"),
            SkuTier::Premium => f.write_str("Premium"),
        }
    }
}

/// SKU of a storage account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub name: SkuName,
    pub tier: SkuTier,
}

impl Sku {
    /// Build a SKU from its name, deriving the tier
    pub fn new(name: SkuName) -> Self {
        Self {
            name,
            tier: name.tier(),
        }
    }
}

/// Check a kind/SKU combination against the provider's support set
pub fn validate_kind_sku(kind: AccountKind, sku: &Sku) -> Result<()> {
    if sku.tier != sku.name.tier() {
        return Err(GroundworkError::invalid_argument(format!(
            "SKU {} belongs to the {} tier, not {}",
            sku.name,
            sku.name.tier(),
            sku.tier
        )));
    }

    let supported = match kind {
        AccountKind::Storage | AccountKind::StorageV2 => true,
        AccountKind::BlobStorage => sku.tier == SkuTier::Standard,
        AccountKind::FileStorage | AccountKind::BlockBlobStorage => sku.tier == SkuTier::Premium,
    };

    if supported {
        Ok(())
    } else {
        Err(GroundworkError::invalid_argument(format!(
            "Account kind {} does not support SKU {} ({} tier)",
            kind, sku.name, sku.tier
        )))
    }
}

/// Declarative description of a storage account to create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAccountCreateRequest {
    pub name: String,
    pub resource_group: String,
    pub location: String,
    pub kind: AccountKind,
    pub sku: Sku,
    pub tags: HashMap<String, String>,
}

impl StorageAccountCreateRequest {
    pub fn new(
        name: impl Into<String>,
        resource_group: impl Into<String>,
        location: impl Into<String>,
        kind: AccountKind,
        sku: Sku,
    ) -> Self {
        Self {
            name: name.into(),
            resource_group: resource_group.into(),
            location: location.into(),
            kind,
            sku,
            tags: HashMap::new(),
        }
    }

    /// Validate the request locally, before any request is issued
    pub fn validate(&self) -> Result<()> {
        validate_storage_account_name(&self.name)?;
        validate_kind_sku(self.kind, &self.sku)?;

        if self.resource_group.is_empty() {
            return Err(GroundworkError::invalid_argument(
                "Resource group is required for storage account creation",
            ));
        }

        if self.location.is_empty() {
            return Err(GroundworkError::invalid_argument(
                "Location is required for storage account creation",
            ));
        }

        Ok(())
    }
}

/// A materialized storage account as returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize, Tabled)]
pub struct StorageAccount {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "SKU")]
    pub sku: String,
    #[tabled(rename = "State")]
    pub provisioning_state: String,
    #[tabled(skip)]
    pub blob_endpoint: Option<String>,
}

/// Result of the provider's name availability pre-flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAvailability {
    pub available: bool,
    pub reason: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("StorageV2".parse::<AccountKind>().unwrap(), AccountKind::StorageV2);
        assert_eq!("storagev2".parse::<AccountKind>().unwrap(), AccountKind::StorageV2);
        assert!("StorageV3".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_sku_parsing_and_tier() {
        let sku: SkuName = "Standard_LRS".parse().unwrap();
        assert_eq!(sku, SkuName::StandardLrs);
        assert_eq!(sku.tier(), SkuTier::Standard);

        let sku: SkuName = "premium_lrs".parse().unwrap();
        assert_eq!(sku.tier(), SkuTier::Premium);

        assert!("Standard_XYZ".parse::<SkuName>().is_err());
    }

    #[test]
    fn test_sku_wire_format() {
        let sku = Sku::new(SkuName::StandardLrs);
        let json = serde_json::to_string(&sku.name).unwrap();
        assert_eq!(json, "\"Standard_LRS\"");
    }

    #[test]
    fn test_supported_kind_sku_combinations() {
        assert!(validate_kind_sku(AccountKind::StorageV2, &Sku::new(SkuName::StandardLrs)).is_ok());
        assert!(validate_kind_sku(AccountKind::StorageV2, &Sku::new(SkuName::PremiumLrs)).is_ok());
        assert!(validate_kind_sku(AccountKind::FileStorage, &Sku::new(SkuName::PremiumLrs)).is_ok());
        assert!(validate_kind_sku(AccountKind::BlobStorage, &Sku::new(SkuName::StandardGrs)).is_ok());
    }

    #[test]
    fn test_unsupported_kind_sku_combinations() {
        assert!(validate_kind_sku(AccountKind::FileStorage, &Sku::new(SkuName::StandardLrs)).is_err());
        assert!(
            validate_kind_sku(AccountKind::BlockBlobStorage, &Sku::new(SkuName::StandardZrs))
                .is_err()
        );
        assert!(validate_kind_sku(AccountKind::BlobStorage, &Sku::new(SkuName::PremiumLrs)).is_err());
    }

    #[test]
    fn test_mismatched_tier_is_rejected() {
        let sku = Sku {
            name: SkuName::PremiumLrs,
            tier: SkuTier::Standard,
        };
        assert!(validate_kind_sku(AccountKind::StorageV2, &sku).is_err());
    }

    #[test]
    fn test_request_validation() {
        let request = StorageAccountCreateRequest::new(
            "samplestor042",
            "sample-resource-group",
            "westus",
            AccountKind::StorageV2,
            Sku::new(SkuName::StandardLrs),
        );
        assert!(request.validate().is_ok());

        let bad_name = StorageAccountCreateRequest::new(
            "Sample-Stor",
            "sample-resource-group",
            "westus",
            AccountKind::StorageV2,
            Sku::new(SkuName::StandardLrs),
        );
        assert!(bad_name.validate().is_err());

        let bad_combo = StorageAccountCreateRequest::new(
            "samplestor042",
            "sample-resource-group",
            "westus",
            AccountKind::FileStorage,
            Sku::new(SkuName::StandardLrs),
        );
        assert!(bad_combo.validate().is_err());
    }
}
