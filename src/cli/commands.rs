//! Command definitions and execution

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::auth::provider::AuthProviderFactory;
use crate::config::Config;
use crate::error::Result;
use crate::provision::{ProvisionManager, ProvisionOptions};
use crate::resource::models::ResourceGroupSpec;
use crate::storage::models::{AccountKind, Sku, SkuName, StorageAccountCreateRequest};
use crate::utils::format::{OutputFormat, TableFormatter};
use crate::utils::naming::generate_account_name;

#[derive(Parser)]
#[command(
    name = "gw",
    about = "Provision Azure resource groups and storage accounts",
    version = env!("VERSION_WITH_GIT")
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Provision a resource group and a storage account
    Provision {
        /// Resource group name (defaults to the configured group)
        #[arg(short = 'g', long)]
        resource_group: Option<String>,

        /// Azure region for both resources
        #[arg(short = 'l', long)]
        location: Option<String>,

        /// Storage account name (generated from the configured prefix when omitted)
        #[arg(short = 'n', long)]
        account_name: Option<String>,

        /// Storage account kind (e.g. StorageV2)
        #[arg(long)]
        kind: Option<String>,

        /// Storage SKU (e.g. Standard_LRS)
        #[arg(long)]
        sku: Option<String>,

        /// Skip the name availability pre-flight
        #[arg(long)]
        skip_name_check: bool,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Provision {
                resource_group,
                location,
                account_name,
                kind,
                sku,
                skip_name_check,
                json,
                no_color,
            } => {
                execute_provision(
                    config,
                    ProvisionArgs {
                        resource_group,
                        location,
                        account_name,
                        kind,
                        sku,
                        skip_name_check,
                        json,
                        no_color,
                    },
                )
                .await
            }
            Commands::Config { command } => execute_config(config, command),
            Commands::Completions { shell } => {
                clap_complete::generate(shell, &mut Cli::command(), "gw", &mut io::stdout());
                Ok(())
            }
        }
    }
}

/// Provision flags after parsing
struct ProvisionArgs {
    resource_group: Option<String>,
    location: Option<String>,
    account_name: Option<String>,
    kind: Option<String>,
    sku: Option<String>,
    skip_name_check: bool,
    json: bool,
    no_color: bool,
}

async fn execute_provision(config: Config, args: ProvisionArgs) -> Result<()> {
    let group_name = args
        .resource_group
        .unwrap_or_else(|| config.default_resource_group.clone());
    let location = args
        .location
        .unwrap_or_else(|| config.default_location.clone());
    let account_name = args
        .account_name
        .unwrap_or_else(|| generate_account_name(&config.default_account_prefix));

    // Flags win over configured defaults, which win over the built-in ones
    let kind: AccountKind = args
        .kind
        .or_else(|| config.default_kind.clone())
        .as_deref()
        .unwrap_or("StorageV2")
        .parse()?;
    let sku_name: SkuName = args
        .sku
        .or_else(|| config.default_sku.clone())
        .as_deref()
        .unwrap_or("Standard_LRS")
        .parse()?;

    let output = if args.json || config.output_json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let options = ProvisionOptions {
        skip_name_check: args.skip_name_check,
        poll_interval: std::time::Duration::from_secs(config.poll_interval_secs),
        output,
        no_color: args.no_color || config.no_color,
    };

    // Credential acquisition comes first; nothing can proceed without it
    let auth_provider = AuthProviderFactory::from_config(&config)?;

    let manager =
        ProvisionManager::new(auth_provider, config.subscription_id.clone(), options)?;

    let group_spec =
        ResourceGroupSpec::new(&group_name, &location).with_tag("created-by", "groundwork");
    let account_request = StorageAccountCreateRequest::new(
        &account_name,
        &group_name,
        &location,
        kind,
        Sku::new(sku_name),
    );

    let outcome = manager.provision(&group_spec, &account_request).await?;
    manager.print_summary(&outcome)?;

    Ok(())
}

fn execute_config(config: Config, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let formatter = TableFormatter::new(OutputFormat::Table, config.no_color);
            let rendered = formatter.format_table(std::slice::from_ref(&config))?;
            println!("{}", rendered);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
    }
}
