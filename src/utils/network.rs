use std::time::Duration;

use reqwest::Client;

use crate::error::{GroundworkError, Result};

/// Configuration for HTTP client with proper timeouts and user-friendly error handling
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            user_agent: format!("groundwork/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a properly configured HTTP client with timeouts
pub fn create_http_client(config: &NetworkConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| GroundworkError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Classify transport errors from the management endpoint into user-facing errors
pub fn classify_network_error(error: &reqwest::Error, url: &str) -> GroundworkError {
    let endpoint = extract_host_from_url(url);

    if error.is_timeout() {
        return GroundworkError::connection_timeout(format!(
            "Connection to '{}' timed out. This might be due to network issues or the management endpoint being unreachable.",
            endpoint
        ));
    }

    if error.is_connect() {
        if is_dns_resolution_error(error) {
            return GroundworkError::dns_resolution(
                endpoint.clone(),
                format!(
                    "Unable to resolve '{}'. Please check your network and proxy configuration.",
                    endpoint
                ),
            );
        }

        if error
            .to_string()
            .to_lowercase()
            .contains("connection refused")
        {
            return GroundworkError::connection_refused(format!(
                "Connection to '{}' was refused. The service may be temporarily unavailable.",
                endpoint
            ));
        }

        return GroundworkError::network(format!(
            "Failed to connect to '{}'. Please check your network connection.",
            endpoint
        ));
    }

    if error.to_string().to_lowercase().contains("ssl")
        || error.to_string().to_lowercase().contains("tls")
        || error.to_string().to_lowercase().contains("certificate")
    {
        return GroundworkError::ssl_error(format!(
            "SSL/TLS connection error when accessing '{}'. This may be due to certificate issues or network security policies.",
            endpoint
        ));
    }

    if error.is_request() {
        return GroundworkError::invalid_url(format!(
            "Invalid request to '{}'. Please check the request URL format.",
            endpoint
        ));
    }

    if let Some(status) = error.status() {
        match status.as_u16() {
            503 => {
                return GroundworkError::network(format!(
                    "'{}' is temporarily unavailable. Please try again later.",
                    endpoint
                ))
            }
            502 | 504 => {
                return GroundworkError::network(format!(
                    "Gateway error when accessing '{}'. The Azure service may be experiencing issues.",
                    endpoint
                ))
            }
            _ => {}
        }
    }

    GroundworkError::network(format!(
        "Network error when accessing '{}': {}. Please check your internet connection and try again.",
        endpoint, error
    ))
}

fn is_dns_resolution_error(error: &reqwest::Error) -> bool {
    let error_msg = error.to_string().to_lowercase();
    let dns_indicators = [
        "dns",
        "name resolution",
        "resolve",
        "lookup",
        "name or service not known",
        "nodename nor servname provided",
        "temporary failure in name resolution",
        "no such host",
        "host not found",
        "getaddrinfo failed",
        "could not resolve host",
    ];

    dns_indicators
        .iter()
        .any(|&indicator| error_msg.contains(indicator))
}

/// Extract the host portion of a request URL for error messages
fn extract_host_from_url(url: &str) -> String {
    if let Ok(parsed_url) = url::Url::parse(url) {
        if let Some(host) = parsed_url.host_str() {
            return host.to_string();
        }
    }

    "management.azure.com".to_string()
}

/// Check if a network error is retryable
pub fn is_retryable_error(error: &GroundworkError) -> bool {
    match error {
        GroundworkError::ConnectionTimeout(_) => true,
        GroundworkError::NetworkError(msg) => {
            // Retry on temporary network issues
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("timeout")
                || msg_lower.contains("temporary")
                || msg_lower.contains("503")
                || msg_lower.contains("502")
                || msg_lower.contains("504")
        }
        GroundworkError::AzureApiError(msg) => {
            // Retry on specific Azure API errors
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("503")
                || msg_lower.contains("502")
                || msg_lower.contains("504")
                || msg_lower.contains("429")
                || msg_lower.contains("throttled")
        }
        GroundworkError::DnsResolutionError { .. } => false,
        GroundworkError::ConnectionRefused(_) => false,
        GroundworkError::SslError(_) => false,
        GroundworkError::InvalidUrl(_) => false,
        _ => false,
    }
}
