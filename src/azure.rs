//! Post-apply assertions against live Azure resource state.
//!
//! Every lookup is a single read through the `az` CLI with the answer parsed
//! from its JSON output. Not-found answers map to `Ok(false)` for existence
//! checks; every other CLI failure surfaces the captured output. No retries.
//!
//! This is a library surface: test suites link against it and call the
//! lookups directly from their assertions. The `cdkharness` binary carries
//! no wrapper for it beyond the `subscription` subcommand.

use std::path::Path;

use serde_json::Value;

use crate::error::HarnessError;
use crate::exec::run_command;

/// Read-only handle to the cloud CLI.
#[derive(Debug, Clone)]
pub struct AzureCli {
    program: String,
}

impl Default for AzureCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCli {
    pub fn new() -> Self {
        Self {
            program: "az".to_string(),
        }
    }

    /// Points the wrapper at a different executable, for tests.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Whether a resource of the given ARM type exists in the resource group.
    pub fn resource_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        let value = self.show(&[
            "resource",
            "show",
            "--subscription",
            subscription_id,
            "--resource-group",
            resource_group,
            "--resource-type",
            resource_type,
            "--name",
            name,
        ])?;
        Ok(value.is_some())
    }

    pub fn resource_group_exists(
        &self,
        subscription_id: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        let value = self.show(&[
            "group",
            "show",
            "--subscription",
            subscription_id,
            "--name",
            name,
        ])?;
        Ok(value.is_some())
    }

    pub fn storage_account_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        self.resource_exists(
            subscription_id,
            resource_group,
            "Microsoft.Storage/storageAccounts",
            name,
        )
    }

    /// SKU name of a storage account, e.g. `Standard_LRS`.
    pub fn storage_account_sku(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<String, HarnessError> {
        self.string_property(
            &[
                "storage",
                "account",
                "show",
                "--subscription",
                subscription_id,
                "--resource-group",
                resource_group,
                "--name",
                name,
            ],
            name,
            "/sku/name",
        )
    }

    pub fn container_registry_sku(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<String, HarnessError> {
        self.string_property(
            &[
                "acr",
                "show",
                "--subscription",
                subscription_id,
                "--resource-group",
                resource_group,
                "--name",
                name,
            ],
            name,
            "/sku/name",
        )
    }

    pub fn key_vault_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        self.resource_exists(
            subscription_id,
            resource_group,
            "Microsoft.KeyVault/vaults",
            name,
        )
    }

    pub fn virtual_network_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        self.resource_exists(
            subscription_id,
            resource_group,
            "Microsoft.Network/virtualNetworks",
            name,
        )
    }

    pub fn subnet_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        virtual_network: &str,
        subnet: &str,
    ) -> Result<bool, HarnessError> {
        let value = self.show(&[
            "network",
            "vnet",
            "subnet",
            "show",
            "--subscription",
            subscription_id,
            "--resource-group",
            resource_group,
            "--vnet-name",
            virtual_network,
            "--name",
            subnet,
        ])?;
        Ok(value.is_some())
    }

    /// Size of a virtual machine, e.g. `Standard_B1s`.
    pub fn virtual_machine_size(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<String, HarnessError> {
        self.string_property(
            &[
                "vm",
                "show",
                "--subscription",
                subscription_id,
                "--resource-group",
                resource_group,
                "--name",
                name,
            ],
            name,
            "/hardwareProfile/vmSize",
        )
    }

    pub fn vm_scale_set_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        self.resource_exists(
            subscription_id,
            resource_group,
            "Microsoft.Compute/virtualMachineScaleSets",
            name,
        )
    }

    /// SKU name of a virtual machine scale set.
    pub fn vm_scale_set_sku(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<String, HarnessError> {
        self.string_property(
            &[
                "vmss",
                "show",
                "--subscription",
                subscription_id,
                "--resource-group",
                resource_group,
                "--name",
                name,
            ],
            name,
            "/sku/name",
        )
    }

    pub fn log_analytics_workspace_sku(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<String, HarnessError> {
        self.string_property(
            &[
                "monitor",
                "log-analytics",
                "workspace",
                "show",
                "--subscription",
                subscription_id,
                "--resource-group",
                resource_group,
                "--workspace-name",
                name,
            ],
            name,
            "/sku/name",
        )
    }

    pub fn application_insights_exists(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<bool, HarnessError> {
        self.resource_exists(
            subscription_id,
            resource_group,
            "Microsoft.Insights/components",
            name,
        )
    }

    /// Whether a diagnostic setting with the given name is attached to the
    /// resource identified by its full ARM id.
    pub fn diagnostic_settings_exist(
        &self,
        subscription_id: &str,
        resource_id: &str,
        setting_name: &str,
    ) -> Result<bool, HarnessError> {
        let value = self.show(&[
            "monitor",
            "diagnostic-settings",
            "show",
            "--subscription",
            subscription_id,
            "--resource",
            resource_id,
            "--name",
            setting_name,
        ])?;
        Ok(value.is_some())
    }

    /// Runs a `show`-style command. Exit 0 parses stdout as JSON; a
    /// not-found answer becomes `None`; anything else is an error with the
    /// captured output.
    fn show(&self, args: &[&str]) -> Result<Option<Value>, HarnessError> {
        let mut full_args: Vec<String> = args.iter().map(|part| (*part).to_string()).collect();
        full_args.push("-o".to_string());
        full_args.push("json".to_string());

        let output = run_command(Path::new("."), &self.program, &full_args)?;
        if output.success() {
            let value: Value = serde_json::from_str(&output.stdout).map_err(|error| {
                HarnessError::Parse {
                    path: format!("{} {}", self.program, args.join(" ")),
                    source: error,
                }
            })?;
            return Ok(Some(value));
        }

        if is_not_found(&output.stderr) {
            return Ok(None);
        }

        Err(HarnessError::CommandFailed {
            program: self.program.clone(),
            exit_code: output.exit_code,
            output: output.combined(),
        })
    }

    fn string_property(
        &self,
        args: &[&str],
        resource: &str,
        pointer: &str,
    ) -> Result<String, HarnessError> {
        let value = self.show(args)?.ok_or_else(|| HarnessError::PropertyMissing {
            resource: resource.to_string(),
            property: pointer.to_string(),
        })?;

        value
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| HarnessError::PropertyMissing {
                resource: resource.to_string(),
                property: pointer.to_string(),
            })
    }
}

fn is_not_found(stderr: &str) -> bool {
    const MARKERS: &[&str] = &[
        "ResourceNotFound",
        "ResourceGroupNotFound",
        "NotFound",
        "was not found",
        "could not be found",
        "does not exist",
    ];
    MARKERS.iter().any(|marker| stderr.contains(marker))
}
