use thiserror::Error;

/// Main error type for groundwork operations
#[derive(Debug, Error)]
pub enum GroundworkError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Azure API error: {0}")]
    AzureApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource group not found: {name}")]
    ResourceGroupNotFound { name: String },

    #[error("Storage account not found: {name}")]
    StorageAccountNotFound { name: String },

    #[error("Storage account name '{name}' is not available: {reason}")]
    NameNotAvailable { name: String, reason: String },

    #[error("Invalid resource name '{name}': {details}")]
    InvalidResourceName { name: String, details: String },

    #[error("Provisioning operation '{operation}' failed: {details}")]
    OperationFailed { operation: String, details: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("DNS resolution failed for endpoint '{endpoint}': {details}")]
    DnsResolutionError { endpoint: String, details: String },

    #[error("SSL/TLS error: {0}")]
    SslError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration loading error: {0}")]
    ConfigLoadError(#[from] config::ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation timeout")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GroundworkError {
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::AuthenticationError(msg.into())
    }

    pub fn azure_api<S: Into<String>>(msg: S) -> Self {
        Self::AzureApiError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn resource_group_not_found<S: Into<String>>(name: S) -> Self {
        Self::ResourceGroupNotFound { name: name.into() }
    }

    pub fn storage_account_not_found<S: Into<String>>(name: S) -> Self {
        Self::StorageAccountNotFound { name: name.into() }
    }

    pub fn name_not_available<S: Into<String>>(name: S, reason: S) -> Self {
        Self::NameNotAvailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_resource_name<S: Into<String>>(name: S, details: S) -> Self {
        Self::InvalidResourceName {
            name: name.into(),
            details: details.into(),
        }
    }

    pub fn operation_failed<S: Into<String>>(operation: S, details: S) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            details: details.into(),
        }
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn connection_timeout<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionTimeout(msg.into())
    }

    pub fn connection_refused<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionRefused(msg.into())
    }

    pub fn dns_resolution<S: Into<String>>(endpoint: S, details: S) -> Self {
        Self::DnsResolutionError {
            endpoint: endpoint.into(),
            details: details.into(),
        }
    }

    pub fn ssl_error<S: Into<String>>(msg: S) -> Self {
        Self::SslError(msg.into())
    }

    pub fn invalid_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::SerializationError(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Self {
        Self::Unknown(msg.into())
    }
}

/// Result type alias for groundwork operations
pub type Result<T> = std::result::Result<T, GroundworkError>;

/// Convert Azure Core errors to GroundworkError
impl From<azure_core::Error> for GroundworkError {
    fn from(error: azure_core::Error) -> Self {
        Self::AzureApiError(error.to_string())
    }
}
