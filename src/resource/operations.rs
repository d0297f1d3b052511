//! Resource group operations implementation
//!
//! Resource groups are created with an ARM PUT, which has create-or-update
//! semantics: re-submitting an existing group with the same location confirms
//! it and returns the same identifier instead of failing.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::models::{ResourceGroup, ResourceGroupSpec};
use crate::auth::provider::AzureAuthProvider;
use crate::error::{GroundworkError, Result};
use crate::utils::naming::validate_resource_group_name;
use crate::utils::network::{classify_network_error, create_http_client, NetworkConfig};
use crate::utils::retry::{retry_with_backoff, RetryOptions};

const RESOURCE_GROUP_API_VERSION: &str = "2021-04-01";

/// Trait for resource group operations
#[async_trait]
pub trait ResourceGroupOperations: Send + Sync {
    /// Create a resource group, or confirm/update an existing one
    async fn create_or_update(&self, spec: &ResourceGroupSpec) -> Result<ResourceGroup>;

    /// Get resource group details
    async fn get(&self, name: &str) -> Result<ResourceGroup>;

    /// Check resource group existence
    async fn exists(&self, name: &str) -> Result<bool> {
        match self.get(name).await {
            Ok(_) => Ok(true),
            Err(GroundworkError::ResourceGroupNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Azure resource group operations implementation
pub struct AzureResourceGroupOperations {
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
    subscription_id: String,
}

impl AzureResourceGroupOperations {
    /// Create a new Azure resource group operations instance
    pub fn new(auth_provider: Arc<dyn AzureAuthProvider>, subscription_id: String) -> Result<Self> {
        let network_config = NetworkConfig::default();
        let http_client = create_http_client(&network_config)?;

        Ok(Self {
            auth_provider,
            http_client,
            subscription_id,
        })
    }

    /// Create authorized headers for the Azure REST API
    async fn create_headers(&self) -> Result<HeaderMap> {
        let token = self.auth_provider.get_management_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            format!("Bearer {}", token).parse().map_err(|e| {
                GroundworkError::authentication(format!("Invalid token format: {}", e))
            })?,
        );
        headers.insert("Content-Type", "application/json".parse().unwrap());
        headers.insert(
            "x-ms-client-request-id",
            Uuid::new_v4().to_string().parse().unwrap(),
        );
        Ok(headers)
    }

    /// Build Azure Resource Manager URL
    fn build_arm_url(&self, path: &str) -> String {
        format!("https://management.azure.com{}", path)
    }

    /// Get resource group ARM resource ID
    fn group_resource_id(&self, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{}",
            self.subscription_id, name
        )
    }

    /// Parse Azure error response
    fn parse_azure_error(&self, status: u16, body: &str) -> GroundworkError {
        if let Ok(error_json) = serde_json::from_str::<Value>(body) {
            if let Some(error) = error_json.get("error") {
                if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                    return GroundworkError::azure_api(format!("HTTP {}: {}", status, message));
                }
            }
        }
        GroundworkError::azure_api(format!("HTTP {}: {}", status, body))
    }

    /// Retry wrapper for Azure operations
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry_options = RetryOptions {
            max_retries: 3,
            initial_interval: std::time::Duration::from_millis(1000),
            max_interval: std::time::Duration::from_millis(10000),
            multiplier: 2.0,
        };
        retry_with_backoff(operation, retry_options).await
    }

    /// Parse an ARM resource group response
    fn parse_resource_group(&self, data: &Value) -> Result<ResourceGroup> {
        let id = data
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                GroundworkError::serialization("Missing id in resource group response")
            })?
            .to_string();

        let name = data
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let location = data
            .get("location")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let provisioning_state = data
            .get("properties")
            .and_then(|p| p.get("provisioningState"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();

        let mut tags = std::collections::HashMap::new();
        if let Some(tags_obj) = data.get("tags").and_then(|v| v.as_object()) {
            for (key, value) in tags_obj {
                if let Some(val_str) = value.as_str() {
                    tags.insert(key.clone(), val_str.to_string());
                }
            }
        }

        Ok(ResourceGroup {
            id,
            name,
            location,
            provisioning_state,
            tags,
        })
    }
}

#[async_trait]
impl ResourceGroupOperations for AzureResourceGroupOperations {
    async fn create_or_update(&self, spec: &ResourceGroupSpec) -> Result<ResourceGroup> {
        validate_resource_group_name(&spec.name)?;

        let operation = || async {
            let headers = self.create_headers().await?;
            let url = self.build_arm_url(&format!(
                "{}?api-version={}",
                self.group_resource_id(&spec.name),
                RESOURCE_GROUP_API_VERSION
            ));

            let body = json!({
                "location": spec.location,
                "tags": spec.tags,
            });

            debug!(group = %spec.name, "Submitting resource group create-or-update");

            let response = self
                .http_client
                .put(&url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .map_err(|e| classify_network_error(&e, &url))?;

            if !response.status().is_success() {
                let status_code = response.status().as_u16();
                let error_body = response.text().await.unwrap_or_default();
                return Err(self.parse_azure_error(status_code, &error_body));
            }

            let group_data: Value = response.json().await.map_err(|e| {
                GroundworkError::serialization(format!(
                    "Failed to parse resource group response: {}",
                    e
                ))
            })?;

            self.parse_resource_group(&group_data)
        };

        self.execute_with_retry(operation).await
    }

    async fn get(&self, name: &str) -> Result<ResourceGroup> {
        let operation = || async {
            let headers = self.create_headers().await?;
            let url = self.build_arm_url(&format!(
                "{}?api-version={}",
                self.group_resource_id(name),
                RESOURCE_GROUP_API_VERSION
            ));

            let response = self
                .http_client
                .get(&url)
                .headers(headers)
                .send()
                .await
                .map_err(|e| classify_network_error(&e, &url))?;

            if response.status().as_u16() == 404 {
                return Err(GroundworkError::resource_group_not_found(name));
            }

            if !response.status().is_success() {
                let status_code = response.status().as_u16();
                let error_body = response.text().await.unwrap_or_default();
                return Err(self.parse_azure_error(status_code, &error_body));
            }

            let group_data: Value = response.json().await.map_err(|e| {
                GroundworkError::serialization(format!(
                    "Failed to parse resource group response: {}",
                    e
                ))
            })?;

            self.parse_resource_group(&group_data)
        };

        self.execute_with_retry(operation).await
    }
}
