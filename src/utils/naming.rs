//! Resource name validation and generation
//!
//! Azure enforces different naming rules per resource type: storage account
//! names are 3-24 lowercase alphanumerics and globally unique, resource group
//! names allow a wider character set and only need to be unique within the
//! subscription.

use rand::Rng;
use regex::Regex;

use crate::error::{GroundworkError, Result};

/// Check a storage account name against the provider's naming rules
pub fn is_valid_storage_account_name(name: &str) -> bool {
    if name.len() < 3 || name.len() > 24 {
        return false;
    }

    let re = Regex::new(r"^[a-z0-9]+$").unwrap();
    re.is_match(name)
}

/// Check a resource group name against the provider's naming rules
pub fn is_valid_resource_group_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 90 || name.ends_with('.') {
        return false;
    }

    let re = Regex::new(r"^[-\w\.\(\)]+$").unwrap();
    re.is_match(name)
}

/// Validate a storage account name, returning a descriptive error on failure
pub fn validate_storage_account_name(name: &str) -> Result<()> {
    if is_valid_storage_account_name(name) {
        Ok(())
    } else {
        Err(GroundworkError::invalid_resource_name(
            name,
            "storage account names must be 3-24 lowercase letters and digits",
        ))
    }
}

/// Validate a resource group name, returning a descriptive error on failure
pub fn validate_resource_group_name(name: &str) -> Result<()> {
    if is_valid_resource_group_name(name) {
        Ok(())
    } else {
        Err(GroundworkError::invalid_resource_name(
            name,
            "resource group names must be 1-90 characters of letters, digits, '-', '.', '_', '(' or ')' and cannot end with a period",
        ))
    }
}

/// Generate a storage account name from a prefix and a random numeric suffix.
///
/// The prefix is lowercased and truncated so the result stays within the
/// 24-character limit.
pub fn generate_account_name(prefix: &str) -> String {
    let mut base: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    if base.is_empty() {
        base = "stor".to_string();
    }
    base.truncate(21);

    let suffix = rand::thread_rng().gen_range(0..1000);
    format!("{}{:03}", base, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_storage_account_names() {
        let valid_names = vec!["abc", "samplestor123", "a1b2c3", "xyz123456789012345678901"];

        for name in valid_names {
            assert!(
                is_valid_storage_account_name(name),
                "Name '{}' should be valid",
                name
            );
        }
    }

    #[test]
    fn test_invalid_storage_account_names() {
        let invalid_names = vec![
            "",                          // Empty
            "ab",                        // Too short
            "Samplestor",                // Uppercase
            "sample-stor",               // Hyphen
            "sample_stor",               // Underscore
            "sample stor",               // Space
            "xyz1234567890123456789012", // 25 chars (too long)
        ];

        for name in invalid_names {
            assert!(
                !is_valid_storage_account_name(name),
                "Name '{}' should be invalid",
                name
            );
        }
    }

    #[test]
    fn test_valid_resource_group_names() {
        let valid_names = vec![
            "sample-resource-group",
            "rg_prod.eastus",
            "RG-Mixed-Case",
            "group(1)",
        ];

        for name in valid_names {
            assert!(
                is_valid_resource_group_name(name),
                "Name '{}' should be valid",
                name
            );
        }
    }

    #[test]
    fn test_invalid_resource_group_names() {
        let invalid_names = vec!["", "ends-with-period.", "has space", "has#hash"];

        for name in invalid_names {
            assert!(
                !is_valid_resource_group_name(name),
                "Name '{}' should be invalid",
                name
            );
        }
    }

    #[test]
    fn test_generate_account_name() {
        let name = generate_account_name("samplestor");
        assert!(name.starts_with("samplestor"));
        assert!(is_valid_storage_account_name(&name));

        // Prefix gets normalized
        let name = generate_account_name("My-Storage");
        assert!(name.starts_with("mystorage"));
        assert!(is_valid_storage_account_name(&name));

        // Long prefixes stay within the length limit
        let name = generate_account_name("averyveryverylongaccountprefix");
        assert!(name.len() <= 24);
        assert!(is_valid_storage_account_name(&name));

        // Degenerate prefixes still produce a usable name
        let name = generate_account_name("---");
        assert!(name.starts_with("stor"));
        assert!(is_valid_storage_account_name(&name));
    }
}
