//! Long-running operation poller
//!
//! Azure Resource Manager accepts a create request and reports 202 with a
//! status URL; the resource materializes later. `OperationPoller` owns the
//! handle from that point on, querying status at the cadence the service
//! suggests via Retry-After and resolving to the finished resource or the
//! provider's failure detail. A terminal failure is never retried here, and
//! no timeout is imposed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use crate::error::{GroundworkError, Result};

/// Status of an in-flight long-running operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Handle for an in-flight asynchronous create request.
///
/// Owned exclusively by the poller until it resolves. `completed` carries a
/// resource the provider materialized synchronously, in which case polling
/// short-circuits.
#[derive(Debug, Clone)]
pub struct ProvisioningOperation<T> {
    /// Human-readable description used in error messages
    pub operation: String,
    /// URL to query for operation status
    pub status_url: String,
    /// URL of the resource being created
    pub resource_url: String,
    /// Provider-suggested interval before the first status query
    pub retry_after: Option<Duration>,
    /// Correlation id submitted with the originating request
    pub client_request_id: String,
    /// Resource returned synchronously by the submit call, if any
    pub completed: Option<T>,
}

impl<T> ProvisioningOperation<T> {
    pub fn new(
        operation: impl Into<String>,
        status_url: impl Into<String>,
        resource_url: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            status_url: status_url.into(),
            resource_url: resource_url.into(),
            retry_after: None,
            client_request_id: Uuid::new_v4().to_string(),
            completed: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Wrap a resource the provider returned synchronously
    pub fn finished(operation: impl Into<String>, resource: T) -> Self {
        Self {
            operation: operation.into(),
            status_url: String::new(),
            resource_url: String::new(),
            retry_after: None,
            client_request_id: Uuid::new_v4().to_string(),
            completed: Some(resource),
        }
    }
}

/// Result of a single status query
#[derive(Debug)]
pub struct ProbeOutcome<T> {
    pub status: OperationStatus,
    /// Materialized resource, present when the operation succeeded
    pub resource: Option<T>,
    /// Provider failure detail, present when the operation failed
    pub error: Option<String>,
    /// Service-suggested interval before the next query
    pub retry_after: Option<Duration>,
}

impl<T> ProbeOutcome<T> {
    pub fn pending(retry_after: Option<Duration>) -> Self {
        Self {
            status: OperationStatus::Pending,
            resource: None,
            error: None,
            retry_after,
        }
    }

    pub fn succeeded(resource: T) -> Self {
        Self {
            status: OperationStatus::Succeeded,
            resource: Some(resource),
            error: None,
            retry_after: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Failed,
            resource: None,
            error: Some(error.into()),
            retry_after: None,
        }
    }
}

/// One status query against the provider
#[async_trait]
pub trait OperationProbe: Send + Sync {
    type Resource: Send;

    async fn probe(
        &self,
        operation: &ProvisioningOperation<Self::Resource>,
    ) -> Result<ProbeOutcome<Self::Resource>>;
}

/// Options controlling the poll loop cadence
#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Interval between status queries when the service suggests none
    pub default_interval: Duration,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            default_interval: Duration::from_secs(5),
        }
    }
}

/// Polls a long-running operation to completion
pub struct OperationPoller<T> {
    probe: Arc<dyn OperationProbe<Resource = T>>,
    options: PollerOptions,
}

impl<T: Send> OperationPoller<T> {
    pub fn new(probe: Arc<dyn OperationProbe<Resource = T>>, options: PollerOptions) -> Self {
        Self { probe, options }
    }

    /// Block the calling flow until the operation reaches a terminal state.
    ///
    /// Returns the materialized resource on success; surfaces the provider's
    /// failure detail otherwise. The caller decides whether a failed creation
    /// is retried from the start.
    pub async fn poll_until_done(
        &self,
        mut operation: ProvisioningOperation<T>,
    ) -> Result<T> {
        if let Some(resource) = operation.completed.take() {
            return Ok(resource);
        }

        let mut wait = operation
            .retry_after
            .unwrap_or(self.options.default_interval);

        loop {
            debug!(
                operation = %operation.operation,
                wait_secs = wait.as_secs(),
                "Waiting before status query"
            );
            sleep(wait).await;

            let outcome = self.probe.probe(&operation).await?;
            match outcome.status {
                OperationStatus::Succeeded => {
                    return outcome.resource.ok_or_else(|| {
                        GroundworkError::operation_failed(
                            operation.operation.clone(),
                            "operation succeeded but no resource was returned".to_string(),
                        )
                    });
                }
                OperationStatus::Failed => {
                    let details = outcome
                        .error
                        .unwrap_or_else(|| "provider reported failure without detail".to_string());
                    return Err(GroundworkError::operation_failed(
                        operation.operation.clone(),
                        details,
                    ));
                }
                OperationStatus::Pending => {
                    wait = outcome.retry_after.unwrap_or(self.options.default_interval);
                }
            }
        }
    }
}
