//! Provisioning manager facade
//!
//! Runs the provisioning sequence: resource group create-or-update, storage
//! account begin-create, then polling the returned operation to completion.
//! There is no rollback: a group created before a failing account step is
//! left behind for the operator.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use crate::auth::provider::AzureAuthProvider;
use crate::error::{GroundworkError, Result};
use crate::operation::poller::{OperationPoller, OperationProbe, PollerOptions};
use crate::resource::models::{ResourceGroup, ResourceGroupSpec};
use crate::resource::operations::{AzureResourceGroupOperations, ResourceGroupOperations};
use crate::storage::models::{StorageAccount, StorageAccountCreateRequest};
use crate::storage::operations::{AzureStorageAccountOperations, StorageAccountOperations};
use crate::utils::format::{DisplayUtils, OutputFormat, ProgressIndicator, TableFormatter};

/// Options controlling a provisioning run
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Skip the name availability pre-flight
    pub skip_name_check: bool,
    pub poll_interval: std::time::Duration,
    pub output: OutputFormat,
    pub no_color: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            skip_name_check: false,
            poll_interval: std::time::Duration::from_secs(5),
            output: OutputFormat::Table,
            no_color: false,
        }
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionOutcome {
    pub resource_group: ResourceGroup,
    pub storage_account: StorageAccount,
}

/// One row of the final summary table
#[derive(Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// High-level provisioning manager
pub struct ProvisionManager {
    resource_ops: Arc<dyn ResourceGroupOperations>,
    storage_ops: Arc<dyn StorageAccountOperations>,
    poller: OperationPoller<StorageAccount>,
    display_utils: DisplayUtils,
    options: ProvisionOptions,
}

impl ProvisionManager {
    /// Create a manager backed by the Azure management API
    pub fn new(
        auth_provider: Arc<dyn AzureAuthProvider>,
        subscription_id: String,
        options: ProvisionOptions,
    ) -> Result<Self> {
        let resource_ops = Arc::new(AzureResourceGroupOperations::new(
            auth_provider.clone(),
            subscription_id.clone(),
        )?);
        let storage_ops = Arc::new(AzureStorageAccountOperations::new(
            auth_provider,
            subscription_id,
        )?);

        let poller = OperationPoller::new(
            storage_ops.clone(),
            PollerOptions {
                default_interval: options.poll_interval,
            },
        );

        Ok(Self {
            resource_ops,
            storage_ops,
            poller,
            display_utils: DisplayUtils::new(options.no_color),
            options,
        })
    }

    /// Create a manager from explicit components
    pub fn from_parts(
        resource_ops: Arc<dyn ResourceGroupOperations>,
        storage_ops: Arc<dyn StorageAccountOperations>,
        probe: Arc<dyn OperationProbe<Resource = StorageAccount>>,
        options: ProvisionOptions,
    ) -> Self {
        let poller = OperationPoller::new(
            probe,
            PollerOptions {
                default_interval: options.poll_interval,
            },
        );

        Self {
            resource_ops,
            storage_ops,
            poller,
            display_utils: DisplayUtils::new(options.no_color),
            options,
        }
    }

    /// Run the provisioning sequence to completion.
    ///
    /// The storage account references the group created here; ordering alone
    /// guarantees the group exists before the account call is issued.
    pub async fn provision(
        &self,
        group_spec: &ResourceGroupSpec,
        account_request: &StorageAccountCreateRequest,
    ) -> Result<ProvisionOutcome> {
        info!(group = %group_spec.name, "Creating resource group");
        self.display_utils
            .print_info(&format!("Creating resource group '{}'...", group_spec.name))?;

        let resource_group = self.resource_ops.create_or_update(group_spec).await?;

        self.display_utils.print_success(&format!(
            "Resource group ready: {}",
            resource_group.id
        ))?;

        if !self.options.skip_name_check {
            let availability = self
                .storage_ops
                .check_name_availability(&account_request.name)
                .await?;
            if !availability.available {
                let reason = availability
                    .message
                    .or(availability.reason)
                    .unwrap_or_else(|| "name is already taken".to_string());
                return Err(GroundworkError::name_not_available(
                    account_request.name.clone(),
                    reason,
                ));
            }
        }

        info!(account = %account_request.name, "Creating storage account");
        self.display_utils.print_info(&format!(
            "Creating storage account '{}'...",
            account_request.name
        ))?;

        let operation = self.storage_ops.begin_create(account_request).await?;

        let spinner = ProgressIndicator::new(&format!(
            "Waiting for storage account '{}' to provision...",
            account_request.name
        ));
        let polled = self.poller.poll_until_done(operation).await;
        match &polled {
            Ok(account) => spinner.finish_success(&format!("Storage account ready: {}", account.id)),
            Err(_) => spinner.finish_error("Storage account provisioning failed"),
        }
        let storage_account = polled?;

        Ok(ProvisionOutcome {
            resource_group,
            storage_account,
        })
    }

    /// Render the final summary in the configured output format
    pub fn print_summary(&self, outcome: &ProvisionOutcome) -> Result<()> {
        match self.options.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(outcome)?);
            }
            OutputFormat::Table => {
                let rows = vec![
                    SummaryRow {
                        resource: "Resource group".to_string(),
                        name: outcome.resource_group.name.clone(),
                        state: outcome.resource_group.provisioning_state.clone(),
                        id: outcome.resource_group.id.clone(),
                    },
                    SummaryRow {
                        resource: "Storage account".to_string(),
                        name: outcome.storage_account.name.clone(),
                        state: outcome.storage_account.provisioning_state.clone(),
                        id: outcome.storage_account.id.clone(),
                    },
                ];

                let formatter =
                    TableFormatter::new(OutputFormat::Table, self.options.no_color);
                println!("{}", formatter.format_table(&rows)?);
            }
        }

        Ok(())
    }
}
