//! Credential provider trait and implementations
//!
//! Acquires an identity capable of signing Azure Resource Manager requests.
//! The chain behind `DefaultAzureCredential` tries environment-supplied
//! secrets, managed identity, and the Azure CLI token cache in that order;
//! `ClientSecretProvider` pins an explicit service principal instead.

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::auth::{AccessToken, TokenCredential};
use azure_identity::{ClientSecretCredential, DefaultAzureCredential, TokenCredentialOptions};

use crate::config::Config;
use crate::error::{GroundworkError, Result};

/// OAuth scope for Azure Resource Manager
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Trait for Azure credential providers
#[async_trait]
pub trait AzureAuthProvider: Send + Sync {
    /// Get an access token for the specified scopes
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;

    /// Get the underlying token credential for Azure SDK usage
    fn get_token_credential(&self) -> Arc<dyn TokenCredential>;

    /// Get a bearer token for the management endpoint
    async fn get_management_token(&self) -> Result<String> {
        let token = self.get_token(&[MANAGEMENT_SCOPE]).await?;
        Ok(token.token.secret().to_string())
    }
}

/// Credential provider backed by the ambient DefaultAzureCredential chain
pub struct DefaultAzureCredentialProvider {
    credential: Arc<DefaultAzureCredential>,
}

impl DefaultAzureCredentialProvider {
    pub fn new() -> Result<Self> {
        let credential = Arc::new(
            DefaultAzureCredential::create(TokenCredentialOptions::default()).map_err(|e| {
                GroundworkError::authentication(format!(
                    "Failed to create DefaultAzureCredential: {}",
                    e
                ))
            })?,
        );

        Ok(Self { credential })
    }
}

#[async_trait]
impl AzureAuthProvider for DefaultAzureCredentialProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self.credential.get_token(scopes).await.map_err(|e| {
            GroundworkError::authentication(format!("Failed to get token: {}", e))
        })?;

        Ok(token_response)
    }

    fn get_token_credential(&self) -> Arc<dyn TokenCredential> {
        self.credential.clone()
    }
}

/// Credential provider for an explicit service principal secret
pub struct ClientSecretProvider {
    credential: Arc<ClientSecretCredential>,
    tenant_id: String,
    client_id: String,
}

impl ClientSecretProvider {
    pub fn new(tenant_id: String, client_id: String, client_secret: String) -> Result<Self> {
        let authority = format!("https://login.microsoftonline.com/{}", tenant_id);
        let authority_url = url::Url::parse(&authority)
            .map_err(|e| GroundworkError::config(format!("Invalid authority URL: {}", e)))?;

        let http_client = Arc::new(reqwest::Client::new());
        let credential = Arc::new(ClientSecretCredential::new(
            http_client,
            authority_url,
            client_secret,
            tenant_id.clone(),
            client_id.clone(),
        ));

        Ok(Self {
            credential,
            tenant_id,
            client_id,
        })
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

#[async_trait]
impl AzureAuthProvider for ClientSecretProvider {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let token_response = self.credential.get_token(scopes).await.map_err(|e| {
            GroundworkError::authentication(format!("Failed to get token: {}", e))
        })?;

        Ok(token_response)
    }

    fn get_token_credential(&self) -> Arc<dyn TokenCredential> {
        self.credential.clone()
    }
}

/// Credential provider factory
pub struct AuthProviderFactory;

impl AuthProviderFactory {
    /// Create a credential provider from configuration.
    ///
    /// A full service-principal triplet selects client-secret authentication;
    /// anything less falls through to the ambient credential chain.
    pub fn from_config(config: &Config) -> Result<Arc<dyn AzureAuthProvider>> {
        match (
            config.tenant_id.as_str(),
            config.client_id.as_deref(),
            config.client_secret.as_deref(),
        ) {
            (tenant, Some(client), Some(secret)) if !tenant.is_empty() => {
                Ok(Arc::new(ClientSecretProvider::new(
                    tenant.to_string(),
                    client.to_string(),
                    secret.to_string(),
                )?))
            }
            _ => Ok(Arc::new(DefaultAzureCredentialProvider::new()?)),
        }
    }
}
