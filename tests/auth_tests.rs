use azure_core::auth::AccessToken;
use azure_identity::{DefaultAzureCredential, TokenCredentialOptions};
use time::OffsetDateTime;

#[cfg(test)]
mod auth_provider_tests {
    use super::*;

    #[tokio::test]
    async fn test_default_credential_creation() {
        // Test that DefaultAzureCredential can be created
        // This tests the Azure SDK integration
        let credential = DefaultAzureCredential::create(TokenCredentialOptions::default());
        assert!(credential.is_ok());
    }

    #[tokio::test]
    async fn test_default_provider_creation() {
        let provider = groundwork::auth::DefaultAzureCredentialProvider::new();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_client_secret_provider_creation() {
        let provider = groundwork::auth::ClientSecretProvider::new(
            "12345678-1234-1234-1234-123456789012".to_string(),
            "87654321-4321-4321-4321-210987654321".to_string(),
            "test-secret".to_string(),
        )
        .unwrap();

        assert_eq!(provider.tenant_id(), "12345678-1234-1234-1234-123456789012");
        assert_eq!(provider.client_id(), "87654321-4321-4321-4321-210987654321");
    }
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn test_access_token_creation() {
        // Test AccessToken creation and basic properties
        let token_value = "test-access-token";
        let expires_at = OffsetDateTime::now_utc() + time::Duration::hours(1);

        let token = AccessToken::new(token_value.to_string(), expires_at);

        assert_eq!(token.token.secret(), token_value);
        assert_eq!(token.expires_on, expires_at);
    }

    #[test]
    fn test_token_expiration_logic() {
        // Test token expiration detection
        let now = OffsetDateTime::now_utc();

        // Create an expired token
        let expired_token = AccessToken::new(
            "expired-token".to_string(),
            now - time::Duration::hours(1), // Expired 1 hour ago
        );

        // Create a valid token
        let valid_token = AccessToken::new(
            "valid-token".to_string(),
            now + time::Duration::hours(1), // Expires in 1 hour
        );

        // Test expiration logic
        assert!(expired_token.expires_on < now);
        assert!(valid_token.expires_on > now);
    }
}

#[cfg(test)]
mod authentication_flow_tests {

    #[test]
    fn test_management_scope_format() {
        // The management scope must be a well-formed default scope
        let scope = groundwork::auth::MANAGEMENT_SCOPE;
        assert!(scope.starts_with("https://"));
        assert!(scope.ends_with("/.default"));
        assert!(scope.contains("management.azure.com"));
    }

    #[test]
    fn test_credential_environment_variables() {
        // Test environment variable names for authentication
        let subscription_var = "AZURE_SUBSCRIPTION_ID";
        let tenant_var = "AZURE_TENANT_ID";
        let client_var = "AZURE_CLIENT_ID";
        let secret_var = "AZURE_CLIENT_SECRET";

        assert_eq!(subscription_var, "AZURE_SUBSCRIPTION_ID");
        assert_eq!(tenant_var, "AZURE_TENANT_ID");
        assert_eq!(client_var, "AZURE_CLIENT_ID");
        assert_eq!(secret_var, "AZURE_CLIENT_SECRET");

        // Test environment variable access (won't fail if not set)
        let _subscription = std::env::var(subscription_var).unwrap_or_default();
        let _tenant = std::env::var(tenant_var).unwrap_or_default();
        let _client = std::env::var(client_var).unwrap_or_default();
        let _secret = std::env::var(secret_var).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_factory_falls_back_to_default_chain() {
        // Without a service principal triplet the factory picks the chain
        let config = groundwork::config::Config::default();
        let provider = groundwork::auth::AuthProviderFactory::from_config(&config);
        assert!(provider.is_ok());
    }
}

#[cfg(test)]
mod error_handling_tests {
    use groundwork::error::GroundworkError;

    #[test]
    fn test_authentication_error_message() {
        let err = GroundworkError::authentication("no ambient mechanism succeeded");
        assert!(err.to_string().contains("Authentication failed"));
        assert!(err.to_string().contains("no ambient mechanism succeeded"));
    }

    #[test]
    fn test_guid_format_validation() {
        // Test GUID format validation for tenant and subscription IDs
        let valid_guid = "12345678-1234-1234-1234-123456789012";
        let invalid_guid = "not-a-guid";

        assert_eq!(valid_guid.len(), 36);
        assert_eq!(valid_guid.chars().filter(|&c| c == '-').count(), 4);

        assert_ne!(invalid_guid.len(), 36);
        assert_ne!(invalid_guid.chars().filter(|&c| c == '-').count(), 4);
    }
}
