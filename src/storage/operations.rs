//! Storage account operations implementation
//!
//! Storage account creation is a long-running operation: the PUT returns 202
//! with a status URL and the account materializes later. `begin_create`
//! returns the operation handle immediately; the poller resolves it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::models::{NameAvailability, StorageAccount, StorageAccountCreateRequest};
use crate::auth::provider::AzureAuthProvider;
use crate::error::{GroundworkError, Result};
use crate::operation::poller::{OperationProbe, ProbeOutcome, ProvisioningOperation};
use crate::utils::network::{classify_network_error, create_http_client, NetworkConfig};
use crate::utils::retry::{retry_with_backoff, RetryOptions};

const STORAGE_API_VERSION: &str = "2023-01-01";

/// Trait for storage account operations
#[async_trait]
pub trait StorageAccountOperations: Send + Sync {
    /// Ask the provider whether an account name is free in the global namespace
    async fn check_name_availability(&self, name: &str) -> Result<NameAvailability>;

    /// Submit an account creation and return the operation handle immediately
    async fn begin_create(
        &self,
        request: &StorageAccountCreateRequest,
    ) -> Result<ProvisioningOperation<StorageAccount>>;

    /// Get storage account details
    async fn get(&self, resource_group: &str, name: &str) -> Result<StorageAccount>;
}

/// Azure storage account operations implementation
pub struct AzureStorageAccountOperations {
    auth_provider: Arc<dyn AzureAuthProvider>,
    http_client: Client,
    subscription_id: String,
}

impl AzureStorageAccountOperations {
    /// Create a new Azure storage account operations instance
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

    /// Get storage account ARM resource ID
    fn account_resource_id(&self, resource_group: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
            self.subscription_id, resource_group, name
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
            initial_interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(10000),
            multiplier: 2.0,
        };
        retry_with_backoff(operation, retry_options).await
    }

    /// Parse an ARM storage account response
    fn parse_storage_account(&self, data: &Value) -> Result<StorageAccount> {
        let id = data
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                GroundworkError::serialization("Missing id in storage account response")
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

        let kind = data
            .get("kind")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let sku = data
            .get("sku")
            .and_then(|s| s.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string();

        let properties = data.get("properties");

        let provisioning_state = properties
            .and_then(|p| p.get("provisioningState"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();

        let blob_endpoint = properties
            .and_then(|p| p.get("primaryEndpoints"))
            .and_then(|e| e.get("blob"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Ok(StorageAccount {
            id,
            name,
            location,
            kind,
            sku,
            provisioning_state,
            blob_endpoint,
        })
    }

    /// Extract the status URL from a 202 response, preferring Location
    fn status_url_from_headers(&self, response: &Response, resource_url: &str) -> String {
        for header in ["location", "azure-asyncoperation"] {
            if let Some(value) = response.headers().get(header) {
                if let Ok(url) = value.to_str() {
                    return url.to_string();
                }
            }
        }
        // No polling header: fall back to reading the resource itself
        resource_url.to_string()
    }

    fn retry_after_from_headers(&self, response: &Response) -> Option<Duration> {
        response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    async fn get_by_url(&self, url: &str) -> Result<StorageAccount> {
        let headers = self.create_headers().await?;
        let response = self
            .http_client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| classify_network_error(&e, url))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_body = response.text().await.unwrap_or_default();
            return Err(self.parse_azure_error(status_code, &error_body));
        }

        let account_data: Value = response.json().await.map_err(|e| {
            GroundworkError::serialization(format!(
                "Failed to parse storage account response: {}",
                e
            ))
        })?;

        self.parse_storage_account(&account_data)
    }
}

#[async_trait]
impl StorageAccountOperations for AzureStorageAccountOperations {
    async fn check_name_availability(&self, name: &str) -> Result<NameAvailability> {
        let operation = || async {
            let headers = self.create_headers().await?;
            let url = self.build_arm_url(&format!(
                "/subscriptions/{}/providers/Microsoft.Storage/checkNameAvailability?api-version={}",
                self.subscription_id, STORAGE_API_VERSION
            ));

            let body = json!({
                "name": name,
                "type": "Microsoft.Storage/storageAccounts",
            });

            let response = self
                .http_client
                .post(&url)
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

            let data: Value = response.json().await.map_err(|e| {
                GroundworkError::serialization(format!(
                    "Failed to parse name availability response: {}",
                    e
                ))
            })?;

            Ok(NameAvailability {
                available: data
                    .get("nameAvailable")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
                reason: data
                    .get("reason")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
                message: data
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string()),
            })
        };

        self.execute_with_retry(operation).await
    }

    async fn begin_create(
        &self,
        request: &StorageAccountCreateRequest,
    ) -> Result<ProvisioningOperation<StorageAccount>> {
        // Fails fast: nothing is allocated for an invalid request
        request.validate()?;

        let resource_id = self.account_resource_id(&request.resource_group, &request.name);
        let resource_url =
            self.build_arm_url(&format!("{}?api-version={}", resource_id, STORAGE_API_VERSION));

        let operation = || async {
            let headers = self.create_headers().await?;

            let body = json!({
                "location": request.location,
                "kind": request.kind,
                "sku": { "name": request.sku.name },
                "properties": {},
                "tags": request.tags,
            });

            debug!(account = %request.name, "Submitting storage account create");

            let response = self
                .http_client
                .put(&resource_url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .map_err(|e| classify_network_error(&e, &resource_url))?;

            match response.status() {
                StatusCode::ACCEPTED => {
                    let status_url = self.status_url_from_headers(&response, &resource_url);
                    let retry_after = self.retry_after_from_headers(&response);

                    Ok(ProvisioningOperation::new(
                        format!("create storage account '{}'", request.name),
                        status_url,
                        resource_url.clone(),
                    )
                    .with_retry_after(retry_after))
                }
                status if status.is_success() => {
                    // The provider materialized the account synchronously
                    let account_data: Value = response.json().await.map_err(|e| {
                        GroundworkError::serialization(format!(
                            "Failed to parse storage account response: {}",
                            e
                        ))
                    })?;
                    let account = self.parse_storage_account(&account_data)?;

                    Ok(ProvisioningOperation::finished(
                        format!("create storage account '{}'", request.name),
                        account,
                    ))
                }
                status => {
                    let status_code = status.as_u16();
                    let error_body = response.text().await.unwrap_or_default();
                    Err(self.parse_azure_error(status_code, &error_body))
                }
            }
        };

        self.execute_with_retry(operation).await
    }

    async fn get(&self, resource_group: &str, name: &str) -> Result<StorageAccount> {
        let resource_id = self.account_resource_id(resource_group, name);
        let url =
            self.build_arm_url(&format!("{}?api-version={}", resource_id, STORAGE_API_VERSION));

        let operation = || async {
            let headers = self.create_headers().await?;
            let response = self
                .http_client
                .get(&url)
                .headers(headers)
                .send()
                .await
                .map_err(|e| classify_network_error(&e, &url))?;

            if response.status().as_u16() == 404 {
                return Err(GroundworkError::storage_account_not_found(name));
            }

            if !response.status().is_success() {
                let status_code = response.status().as_u16();
                let error_body = response.text().await.unwrap_or_default();
                return Err(self.parse_azure_error(status_code, &error_body));
            }

            let account_data: Value = response.json().await.map_err(|e| {
                GroundworkError::serialization(format!(
                    "Failed to parse storage account response: {}",
                    e
                ))
            })?;

            self.parse_storage_account(&account_data)
        };

        self.execute_with_retry(operation).await
    }
}

/// Status queries for an in-flight account creation.
///
/// The status endpoint answers 202 while the operation is running. A 200
/// carries either an async-operation status document or the account itself,
/// depending on which header the service handed out.
#[async_trait]
impl OperationProbe for AzureStorageAccountOperations {
    type Resource = StorageAccount;

    async fn probe(
        &self,
        operation: &ProvisioningOperation<StorageAccount>,
    ) -> Result<ProbeOutcome<StorageAccount>> {
        let query = || async {
            let headers = self.create_headers().await?;
            let response = self
                .http_client
                .get(&operation.status_url)
                .headers(headers)
                .send()
                .await
                .map_err(|e| classify_network_error(&e, &operation.status_url))?;

            let retry_after = self.retry_after_from_headers(&response);

            match response.status() {
                StatusCode::ACCEPTED => Ok(ProbeOutcome::pending(retry_after)),
                status if status.is_success() => {
                    let body = response.text().await.unwrap_or_default();
                    if body.trim().is_empty() {
                        return Ok(ProbeOutcome::pending(retry_after));
                    }

                    let data: Value = serde_json::from_str(&body).map_err(|e| {
                        GroundworkError::serialization(format!(
                            "Failed to parse operation status response: {}",
                            e
                        ))
                    })?;

                    self.interpret_status_document(operation, &data, retry_after)
                        .await
                }
                status => {
                    let status_code = status.as_u16();
                    let error_body = response.text().await.unwrap_or_default();
                    Err(self.parse_azure_error(status_code, &error_body))
                }
            }
        };

        self.execute_with_retry(query).await
    }
}

impl AzureStorageAccountOperations {
    async fn interpret_status_document(
        &self,
        operation: &ProvisioningOperation<StorageAccount>,
        data: &Value,
        retry_after: Option<Duration>,
    ) -> Result<ProbeOutcome<StorageAccount>> {
        // Azure-AsyncOperation documents carry a top-level status field
        if let Some(status) = data.get("status").and_then(|v| v.as_str()) {
            return match status {
                "Succeeded" => {
                    let account = self.get_by_url(&operation.resource_url).await?;
                    Ok(ProbeOutcome::succeeded(account))
                }
                "Failed" | "Canceled" => {
                    let detail = data
                        .get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .unwrap_or(status);
                    Ok(ProbeOutcome::failed(detail))
                }
                _ => Ok(ProbeOutcome::pending(retry_after)),
            };
        }

        // Otherwise the body is the resource itself
        let account = self.parse_storage_account(data)?;
        match account.provisioning_state.as_str() {
            "Succeeded" => Ok(ProbeOutcome::succeeded(account)),
            "Failed" | "Canceled" => Ok(ProbeOutcome::failed(format!(
                "storage account entered state {}",
                account.provisioning_state
            ))),
            _ => Ok(ProbeOutcome::pending(retry_after)),
        }
    }
}
